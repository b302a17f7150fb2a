//! Typed client for the air-quality backend
//!
//! Each operation maps to one HTTP call, except
//! [`DashboardClient::get_aggregated_dashboard_data`], which tries the
//! composite endpoint and falls back to assembling a partial view from the
//! narrower endpoints.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::{BackendConfig, FallbackPolicy};
use crate::io::{HttpClient, HttpResponse, ReqwestHttpClient};
use crate::types::{
    BlockchainLogEntry, ControlStatus, DashboardView, DeviceId, DevicesResponse, HealthStatus,
    HistoryResponse, LogsResponse, SensorReading, PARTIAL_DATA_STATUS,
};
use crate::{DashboardError, Result};

/// Number of audit log entries included in a fallback view
pub const FALLBACK_LOG_LIMIT: usize = 10;

const HTTP_NOT_IMPLEMENTED: u16 = 501;

const HEALTH: &[&str] = &["health"];
const DEVICES: &[&str] = &["api", "v1", "dashboard", "devices"];
const SENSOR_HISTORY: &[&str] = &["api", "v1", "sensor", "history"];
const SENSOR_STATUS: &[&str] = &["api", "v1", "sensor", "status"];
const ANALYTICS: &[&str] = &["api", "v1", "dashboard", "analytics"];
const CONTROL_STATUS: &[&str] = &["api", "v1", "control", "status"];
const CONTROL_OVERRIDE: &[&str] = &["api", "v1", "control", "override"];
const BLOCKCHAIN_LOGS: &[&str] = &["api", "v1", "dashboard", "blockchain", "logs"];
const DASHBOARD_DATA: &[&str] = &["api", "v1", "dashboard", "data"];

/// Result of the composite endpoint call, inspected by the aggregation
#[derive(Debug)]
pub enum CompositeOutcome {
    /// The backend returned the full view
    Complete(DashboardView),
    /// The backend answered 501
    NotImplemented,
    /// Any other failure
    Failed(DashboardError),
}

/// Resolved request target
#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoint {
    /// Path component, used in error reports
    path: String,
    url: String,
}

/// Client for the dashboard backend
///
/// Holds only immutable configuration; clone it or share it by reference.
#[derive(Clone)]
pub struct DashboardClient {
    base_url: String,
    fallback_policy: FallbackPolicy,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for DashboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardClient")
            .field("base_url", &self.base_url)
            .field("fallback_policy", &self.fallback_policy)
            .finish()
    }
}

impl DashboardClient {
    /// Build a client backed by reqwest with the configured timeout
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = ReqwestHttpClient::new(config.timeout())?;
        Ok(Self::with_http(&config.url, Arc::new(http))
            .with_fallback_policy(config.fallback_policy))
    }

    /// Build a client over an arbitrary transport
    pub fn with_http(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created DashboardClient for {}", base_url);
        Self {
            base_url,
            fallback_policy: FallbackPolicy::default(),
            http,
        }
    }

    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback_policy
    }

    pub async fn health_check(&self) -> Result<HealthStatus> {
        self.get_json(&self.endpoint(HEALTH, None)?, &[]).await
    }

    /// All registered devices; empty when the backend knows none
    pub async fn list_devices(&self) -> Result<Vec<DeviceId>> {
        let response: DevicesResponse = self.get_json(&self.endpoint(DEVICES, None)?, &[]).await?;
        Ok(response.devices)
    }

    /// Most-recent-first readings, at most `limit` of them
    pub async fn get_sensor_history(
        &self,
        device_id: &str,
        limit: usize,
    ) -> Result<Vec<SensorReading>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let endpoint = self.endpoint(SENSOR_HISTORY, Some(device_id))?;
        let limit_param = limit.to_string();
        let response: HistoryResponse = self
            .get_json(&endpoint, &[("limit", limit_param.as_str())])
            .await?;

        let mut readings = response.readings;
        if readings.len() > limit {
            tracing::debug!(
                "Backend returned {} readings for limit {}, truncating",
                readings.len(),
                limit
            );
            readings.truncate(limit);
        }
        Ok(readings)
    }

    pub async fn get_sensor_status(&self, device_id: &str) -> Result<Value> {
        let endpoint = self.endpoint(SENSOR_STATUS, Some(device_id))?;
        self.get_json(&endpoint, &[]).await
    }

    /// Aggregate statistics over the last `hours` hours
    pub async fn get_analytics(&self, device_id: &str, hours: u32) -> Result<Value> {
        let endpoint = self.endpoint(ANALYTICS, Some(device_id))?;
        let hours_param = hours.to_string();
        self.get_json(&endpoint, &[("hours", hours_param.as_str())])
            .await
    }

    pub async fn get_control_status(&self, device_id: &str) -> Result<ControlStatus> {
        let endpoint = self.endpoint(CONTROL_STATUS, Some(device_id))?;
        self.get_json(&endpoint, &[]).await
    }

    /// Force the fan into a manual state
    ///
    /// `fan_intensity` is sent as given; callers are expected to keep it
    /// within 0..=100.
    pub async fn set_control_override(
        &self,
        device_id: &str,
        fan_on: bool,
        fan_intensity: u8,
    ) -> Result<ControlStatus> {
        let endpoint = self.endpoint(CONTROL_OVERRIDE, None)?;
        let fan_on_param = fan_on.to_string();
        let intensity_param = fan_intensity.to_string();
        tracing::info!(
            "Setting override on {}: fan_on={}, intensity={}",
            device_id,
            fan_on,
            fan_intensity
        );
        let response = self
            .http
            .post(
                &endpoint.url,
                &[
                    ("device_id", device_id),
                    ("fan_on", fan_on_param.as_str()),
                    ("fan_intensity", intensity_param.as_str()),
                ],
            )
            .await?;
        decode(&endpoint.path, response)
    }

    /// Return the fan to automatic control
    pub async fn clear_control_override(&self, device_id: &str) -> Result<ControlStatus> {
        let endpoint = self.endpoint(CONTROL_OVERRIDE, Some(device_id))?;
        tracing::info!("Clearing override on {}", device_id);
        let response = self.http.delete(&endpoint.url).await?;
        decode(&endpoint.path, response)
    }

    pub async fn get_blockchain_logs(&self, limit: usize) -> Result<Vec<BlockchainLogEntry>> {
        let endpoint = self.endpoint(BLOCKCHAIN_LOGS, None)?;
        let limit_param = limit.to_string();
        let response: LogsResponse = self
            .get_json(&endpoint, &[("limit", limit_param.as_str())])
            .await?;
        Ok(response.logs)
    }

    /// The composite endpoint on its own, without fallback
    pub async fn get_dashboard_data(&self, device_id: &str) -> Result<DashboardView> {
        let endpoint = self.endpoint(DASHBOARD_DATA, Some(device_id))?;
        self.get_json(&endpoint, &[]).await
    }

    /// Call the composite endpoint and classify the result
    pub async fn fetch_composite(&self, device_id: &str) -> CompositeOutcome {
        let endpoint = match self.endpoint(DASHBOARD_DATA, Some(device_id)) {
            Ok(endpoint) => endpoint,
            Err(e) => return CompositeOutcome::Failed(e),
        };
        let response = match self.http.get(&endpoint.url, &[]).await {
            Ok(response) => response,
            Err(e) => return CompositeOutcome::Failed(e),
        };
        if response.status == HTTP_NOT_IMPLEMENTED {
            return CompositeOutcome::NotImplemented;
        }
        match decode(&endpoint.path, response) {
            Ok(view) => CompositeOutcome::Complete(view),
            Err(e) => CompositeOutcome::Failed(e),
        }
    }

    /// Best-effort view of a device
    ///
    /// Returns the composite payload untouched when the backend provides
    /// it. Otherwise builds a partial view from history, control status and
    /// the audit log, with `system_health.status` set to `partial_data`.
    /// Fails with [`DashboardError::AggregationFailed`] if any of those
    /// calls fail; no partial object is returned in that case.
    pub async fn get_aggregated_dashboard_data(&self, device_id: &str) -> Result<DashboardView> {
        match self.fetch_composite(device_id).await {
            CompositeOutcome::Complete(view) => return Ok(view),
            CompositeOutcome::NotImplemented => {
                tracing::info!(
                    "Composite endpoint not implemented for {}, aggregating",
                    device_id
                );
            }
            CompositeOutcome::Failed(e) => match self.fallback_policy {
                FallbackPolicy::AnyFailure => {
                    tracing::warn!(
                        "Composite endpoint failed for {}: {}. Aggregating",
                        device_id,
                        e
                    );
                }
                FallbackPolicy::NotImplementedOnly => return Err(e),
            },
        }

        self.aggregate_fallback(device_id)
            .await
            .map_err(|e| DashboardError::AggregationFailed(Box::new(e)))
    }

    async fn aggregate_fallback(&self, device_id: &str) -> Result<DashboardView> {
        let current_reading = self
            .get_sensor_history(device_id, 1)
            .await?
            .into_iter()
            .next();
        let control_status = self.get_control_status(device_id).await?;
        let recent_logs = self.get_blockchain_logs(FALLBACK_LOG_LIMIT).await?;

        let mut system_health = Map::new();
        system_health.insert(
            "status".to_string(),
            Value::String(PARTIAL_DATA_STATUS.to_string()),
        );

        Ok(DashboardView {
            current_reading,
            prediction: None,
            classification: None,
            control_status: Some(control_status),
            recent_faults: Vec::new(),
            system_health,
            recent_logs,
            extra: Map::new(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self.http.get(&endpoint.url, query).await?;
        decode(&endpoint.path, response)
    }

    /// Append `segments` and the optional device id to the base URL
    ///
    /// Each segment is percent-encoded on its own, so a device id can never
    /// reach a different route.
    fn endpoint(&self, segments: &[&str], device_id: Option<&str>) -> Result<Endpoint> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            DashboardError::Config(format!("Invalid backend url {:?}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                DashboardError::Config(format!(
                    "Backend url {:?} cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments)
            .extend(device_id);
        Ok(Endpoint {
            path: url.path().to_string(),
            url: url.into(),
        })
    }
}

fn decode<T: DeserializeOwned>(path: &str, response: HttpResponse) -> Result<T> {
    if !response.is_success() {
        tracing::debug!("Non-2xx response from {}: status={}", path, response.status);
        return Err(DashboardError::unavailable(
            path,
            format!("HTTP status {}", response.status),
        ));
    }
    serde_json::from_str(&response.body)
        .map_err(|e| DashboardError::unavailable(path, format!("Invalid response body: {}", e)))
}
