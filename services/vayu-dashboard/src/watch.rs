//! Periodic refresh of the aggregated view

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::DashboardClient;
use crate::types::DashboardView;

/// Consecutive failures after which the loop logs a warning
const ERROR_WARN_THRESHOLD: u32 = 5;

/// Fetch the aggregated view for `device_id` every `interval` until
/// `cancel` fires, handing each result to `on_refresh`.
///
/// Failures are passed through and never stop the loop. An in-flight
/// request is dropped when cancellation arrives. Returns the number of
/// completed refreshes.
pub async fn watch<F>(
    client: &DashboardClient,
    device_id: &str,
    interval: Duration,
    cancel: CancellationToken,
    mut on_refresh: F,
) -> u64
where
    F: FnMut(crate::Result<DashboardView>),
{
    let mut refreshes = 0;
    let mut consecutive_errors: u32 = 0;

    loop {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Refresh for '{}' cancelled mid-request", device_id);
                break;
            }
            result = client.get_aggregated_dashboard_data(device_id) => result,
        };

        if result.is_ok() {
            consecutive_errors = 0;
        } else {
            consecutive_errors += 1;
            if consecutive_errors == ERROR_WARN_THRESHOLD {
                tracing::warn!(
                    "Device '{}' has {} consecutive refresh errors",
                    device_id,
                    consecutive_errors
                );
            }
        }
        refreshes += 1;
        on_refresh(result);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Refresh loop for '{}' cancelled", device_id);
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }

    refreshes
}
