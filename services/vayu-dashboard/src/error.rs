//! Error types for the dashboard client

/// Errors that can occur while talking to the air-quality backend
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Network failure, timeout, non-2xx status or undecodable body from a
    /// single endpoint call
    #[error("Backend unavailable at {endpoint}: {cause}")]
    BackendUnavailable { endpoint: String, cause: String },

    /// The fallback composite could not be assembled
    #[error("Failed to aggregate data: {0}")]
    AggregationFailed(#[source] Box<DashboardError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DashboardError {
    pub fn unavailable(endpoint: impl Into<String>, cause: impl ToString) -> Self {
        DashboardError::BackendUnavailable {
            endpoint: endpoint.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
