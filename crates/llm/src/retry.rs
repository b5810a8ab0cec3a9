//! Retry with exponential backoff for chat-completion requests.
//!
//! Transport failures (connection refused, DNS, timeout) are retried, and so are the
//! statuses a completion provider uses for transient overload: 429 and any 5xx. Other
//! statuses go straight back to the caller. After the last attempt the final outcome is
//! returned as-is, so the caller still sees the provider's status and body.

use reqwest::StatusCode;
use std::time::Duration;

const MAX_RETRIES: u32 = 3;
const BASE_DELAY_MS: u64 = 200;

/// `true` for statuses worth another attempt.
pub(crate) fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt))
}

pub(crate) async fn retry_send<F, Fut>(f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_RETRIES {
        let delay = backoff(attempt);
        match f().await {
            Ok(resp) if is_transient(resp.status()) => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    status = resp.status().as_u16(),
                    "completion provider busy, retrying in {delay:?}"
                );
            }
            Ok(resp) => return Ok(resp),
            Err(e) => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    "completion request failed, retrying in {delay:?}: {e}"
                );
            }
        }
        tokio::time::sleep(delay).await;
    }
    f().await
}
