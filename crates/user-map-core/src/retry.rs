//! Bounded retry with exponential backoff.

use std::fmt::Display;
use std::future::Future;

use tracing::{debug, warn};
use user_map_types::RetryPolicy;

/// Run `op` up to `policy.max_attempts` times.
///
/// After the failed attempt `i` (zero-based) the task sleeps
/// `initial_delay * 2^i`; there is no wait before the first attempt or after
/// the last. The first success is returned immediately. When every attempt
/// fails, the error of the last attempt is returned.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0usize;
    loop {
        match op().await {
            Ok(v) => {
                if attempt > 0 {
                    debug!(op = label, attempt = attempt + 1, "succeeded after retry");
                }
                return Ok(v);
            }
            Err(e) => match policy.delay_after(attempt) {
                Some(delay) => {
                    warn!(
                        op = label,
                        attempt = attempt + 1,
                        max_attempts = policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    warn!(
                        op = label,
                        attempts = attempt + 1,
                        error = %e,
                        "all attempts failed"
                    );
                    return Err(e);
                }
            },
        }
    }
}
