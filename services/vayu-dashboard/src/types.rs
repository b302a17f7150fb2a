//! Response shapes returned by the air-quality backend
//!
//! Every type here is a read-only view produced fresh per request. Field
//! names follow the backend's snake_case JSON.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a physical sensor/actuator unit
pub type DeviceId = String;

/// Arbitrary JSON object returned by `/health`
pub type HealthStatus = Map<String, Value>;

/// Value of `system_health.status` when the view was assembled from the
/// narrower endpoints instead of the composite one
pub const PARTIAL_DATA_STATUS: &str = "partial_data";

/// Declares an enum over the backend's known string values
///
/// Values the client does not recognise decode into `Unknown` carrying the
/// original text, and serialize back to that same text.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident = $wire:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Unknown(String),
        }

        impl $name {
            /// Value as it appears on the wire
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unknown(raw) => raw,
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unknown(_) => "Unknown",
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => $name::$variant,)+
                    _ => $name::Unknown(raw),
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Unknown(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

/// Point-in-time measurement from a device
///
/// Pollutant values the backend leaves out stay `None` and are not written
/// back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// ISO-8601 timestamp, kept as sent by the backend
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm25: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voc: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// AI-agent forecast of an upcoming pollution peak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub will_peak: bool,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_peak_value: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

wire_enum! {
    /// Pollution source inferred by the classifier
    pub enum AirType {
        Cigarette = "cigarette" => "Cigarette Smoke",
        Vehicle = "vehicle" => "Vehicle Exhaust",
        Cooking = "cooking" => "Cooking Fumes",
        Chemical = "chemical" => "Chemical Fumes",
        Clean = "clean" => "Clean Air",
    }
}

/// AI-agent guess at the pollution source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub air_type: AirType,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

wire_enum! {
    pub enum FaultType {
        SensorStuck = "sensor_stuck" => "Sensor Stuck",
        InconsistentReading = "inconsistent_reading" => "Inconsistent Reading",
        FanNotWorking = "fan_not_working" => "Fan Not Working",
        OutOfRange = "out_of_range" => "Out of Range",
        NoFault = "no_fault" => "No Fault",
    }
}

wire_enum! {
    pub enum Severity {
        Low = "low" => "LOW",
        Medium = "medium" => "MEDIUM",
        High = "high" => "HIGH",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultRecord {
    pub has_fault: bool,
    pub fault_type: FaultType,
    pub severity: Severity,
    #[serde(default)]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_sensor: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fan actuator state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlStatus {
    pub fan_on: bool,
    /// Percentage in 0..=100
    pub fan_intensity: u8,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ControlStatus {
    pub fn new(fan_on: bool, fan_intensity: u8) -> Self {
        Self {
            fan_on,
            fan_intensity,
            extra: Map::new(),
        }
    }
}

wire_enum! {
    /// Kind of event recorded in the audit log
    pub enum EventType {
        Decision = "decision" => "Control Decision",
        Fault = "fault" => "Fault Detected",
        Healing = "healing" => "Self-Healing",
    }
}

/// Entry of the append-only audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockchainLogEntry {
    pub event_type: EventType,
    pub timestamp: String,
    pub device_id: DeviceId,
    pub hash: String,
    /// Event payload; `Null` when the backend sent none
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Everything the dashboard shows for one device
///
/// Missing optional fields serialize as `null` so consumers always see the
/// same keys. Keys the client does not model are kept in `extra` and
/// written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    #[serde(default)]
    pub current_reading: Option<SensorReading>,
    #[serde(default)]
    pub prediction: Option<Prediction>,
    #[serde(default)]
    pub classification: Option<Classification>,
    #[serde(default)]
    pub control_status: Option<ControlStatus>,
    #[serde(default)]
    pub recent_faults: Vec<FaultRecord>,
    #[serde(default)]
    pub system_health: Map<String, Value>,
    #[serde(default)]
    pub recent_logs: Vec<BlockchainLogEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DashboardView {
    /// Value of `system_health.status`, if the backend sent a string
    pub fn health_status(&self) -> Option<&str> {
        self.system_health.get("status").and_then(Value::as_str)
    }

    /// True when the view was built by the fallback path
    pub fn is_partial(&self) -> bool {
        self.health_status() == Some(PARTIAL_DATA_STATUS)
    }

    /// Faults that are actually active
    pub fn active_faults(&self) -> impl Iterator<Item = &FaultRecord> {
        self.recent_faults.iter().filter(|f| f.has_fault)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesResponse {
    #[serde(default)]
    pub devices: Vec<DeviceId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub readings: Vec<SensorReading>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<BlockchainLogEntry>,
}
