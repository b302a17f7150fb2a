//! Vayu dashboard - air-quality backend client
//!
//! Typed access to the monitoring backend's REST API, plus an aggregated
//! dashboard view that degrades to partial data when the backend lacks the
//! composite endpoint.

pub mod aqi;
pub mod audit;
pub mod client;
pub mod config;
pub mod error;
pub mod io;
pub mod report;
pub mod types;
pub mod watch;

pub use audit::{AuditLog, EventSummary};
pub use client::{CompositeOutcome, DashboardClient};
pub use config::{load_config, BackendConfig, Config, FallbackPolicy};
pub use error::{DashboardError, Result};
pub use types::{
    AirType, BlockchainLogEntry, Classification, ControlStatus, DashboardView, DeviceId,
    EventType, FaultRecord, FaultType, HealthStatus, Prediction, SensorReading, Severity,
    PARTIAL_DATA_STATUS,
};
