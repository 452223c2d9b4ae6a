use std::fmt::Display;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Delays between attempts for remote model calls: 1s, 2s, then 4s.
pub const DEFAULT_DELAYS: [Duration; 3] = [
    Duration::from_secs(1),
    Duration::from_secs(2),
    Duration::from_secs(4),
];

/// Retry an async operation with backoff.
///
/// # Arguments
/// * `operation` - The async operation to retry
/// * `delays` - Pause before each retry; the operation runs `delays.len() + 1`
///   times at most
///
/// # Returns
/// The first successful result, or the error of the last attempt
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, delays: &[Duration]) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: Display,
{
    let total = delays.len() + 1;
    let mut result = operation().await;

    for (i, delay) in delays.iter().enumerate() {
        match &result {
            Ok(_) => break,
            Err(e) => warn!(
                "Request failed (attempt {}/{total}): {e}. Retrying after {}ms...",
                i + 1,
                delay.as_millis()
            ),
        }
        sleep(*delay).await;
        result = operation().await;
    }

    result
}
