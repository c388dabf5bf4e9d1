//! Bounded retry of transient transport failures around outbound calls.
//!
//! HTTP status codes, including 429, are never retried here — they pass
//! through to the poller's state machine unchanged.

use std::future::Future;
use std::time::Duration;

use tokio_retry2::{Retry, RetryError, strategy::FixedInterval};

pub const MAX_ATTEMPTS: usize = 3;
pub const BASE_DELAY: Duration = Duration::from_secs(2);

pub async fn with_retry<F, Fut, T>(op: F) -> Result<T, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let strategy = FixedInterval::from_millis(BASE_DELAY.as_millis() as u64).take(MAX_ATTEMPTS - 1);

    let action = || async { op().await.map_err(RetryError::transient) };

    Retry::spawn(strategy, action).await
}
