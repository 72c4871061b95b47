use std::future::Future;
use std::time::Duration;

use ecr_audit_core::{AppError, AppResult};

/// Default upper bound for a single gateway call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs one gateway call, turning an elapsed deadline into `GatewayUnavailable`.
pub(crate) async fn bounded<T>(
    timeout: Duration,
    operation: &str,
    call: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(AppError::GatewayUnavailable(format!(
            "{operation} timed out after {} ms",
            timeout.as_millis()
        ))),
    }
}
