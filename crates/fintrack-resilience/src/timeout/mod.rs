//! Timeout wrapper for async operations.

use fintrack_core::{FintrackError, FintrackResult};
use std::future::Future;
use std::time::Duration;

/// Runs `future` with a deadline, mapping expiry to `FintrackError::Timeout`.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> FintrackResult<T>
where
    F: Future<Output = FintrackResult<T>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(FintrackError::Timeout(format!(
            "Operation timed out after {duration:?}"
        ))),
    }
}
