//! Plain-text rendering of a dashboard view for the terminal

use crate::aqi::{format_timestamp, truncate, AqiCategory, Co2Level, ConfidenceLevel};
use crate::types::{DashboardView, SensorReading};

const HASH_DISPLAY_CHARS: usize = 16;
const REASONING_DISPLAY_CHARS: usize = 100;

/// Render `view` for `device_id` as a multi-line report
pub fn render_dashboard(device_id: &str, view: &DashboardView) -> String {
    let header = if view.is_partial() {
        format!(
            "Device {}\n  (partial data: prediction, classification and faults unavailable)\n",
            device_id
        )
    } else {
        format!("Device {}\n", device_id)
    };

    let reading = match &view.current_reading {
        Some(r) => render_reading(r),
        None => "Reading: none\n".to_string(),
    };

    let prediction = match &view.prediction {
        Some(p) => {
            let outlook = if p.will_peak { "peak expected" } else { "stable" };
            let peak = p
                .estimated_peak_value
                .map(|v| format!(", peak ~{:.1}", v))
                .unwrap_or_default();
            format!(
                "Prediction: {} ({} confidence{})\n  {}\n",
                outlook,
                ConfidenceLevel::from_confidence(p.confidence),
                peak,
                truncate(&p.reasoning, REASONING_DISPLAY_CHARS)
            )
        }
        None => "Prediction: unavailable\n".to_string(),
    };

    let classification = match &view.classification {
        Some(c) => format!(
            "Air type: {} ({} confidence)\n",
            c.air_type,
            ConfidenceLevel::from_confidence(c.confidence)
        ),
        None => "Air type: unavailable\n".to_string(),
    };

    let fan = match &view.control_status {
        Some(c) if c.fan_on => format!("Fan: on at {}%\n", c.fan_intensity),
        Some(_) => "Fan: off\n".to_string(),
        None => "Fan: unknown\n".to_string(),
    };

    let fault_rows: String = view
        .active_faults()
        .map(|fault| {
            let sensor = fault
                .affected_sensor
                .as_ref()
                .map(|s| format!(" on {}", s))
                .unwrap_or_default();
            format!(
                "  [{}] {}{}: {}\n",
                fault.severity, fault.fault_type, sensor, fault.details
            )
        })
        .collect();
    let faults = if fault_rows.is_empty() {
        "Faults: none\n".to_string()
    } else {
        format!("Faults:\n{}", fault_rows)
    };

    let event_rows: String = view
        .recent_logs
        .iter()
        .map(|entry| {
            format!(
                "  {}  {:<16}  {}\n",
                format_timestamp(&entry.timestamp),
                entry.event_type.label(),
                truncate(&entry.hash, HASH_DISPLAY_CHARS)
            )
        })
        .collect();
    let events = if event_rows.is_empty() {
        String::new()
    } else {
        format!("Recent events:\n{}", event_rows)
    };

    format!(
        "{}{}{}{}{}{}{}",
        header, reading, prediction, classification, fan, faults, events
    )
}

fn render_reading(r: &SensorReading) -> String {
    let pm25_category = r
        .pm25
        .map(|v| format!(" ({})", AqiCategory::from_pm25(v)))
        .unwrap_or_default();
    let co2_level = r
        .co2
        .map(|v| format!(" ({})", Co2Level::from_ppm(v)))
        .unwrap_or_default();
    format!(
        "Reading at {}\n  PM2.5 {} µg/m³{}\n  CO2   {} ppm{}\n  CO    {} ppm\n  VOC   {} ppm\n",
        format_timestamp(&r.timestamp),
        measurement(r.pm25),
        pm25_category,
        measurement(r.co2),
        co2_level,
        measurement(r.co),
        measurement(r.voc)
    )
}

fn measurement(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "n/a".to_string())
}
