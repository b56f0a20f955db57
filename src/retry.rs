use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{CollectError, Result};

/// Retry a network call with linear backoff.
///
/// Calls `f` up to `max_attempts` times, sleeping `base_delay * attempt` between
/// attempts. Only transient failures are retried (see
/// [`CollectError::is_retryable`]); client errors and structural errors are
/// returned immediately.
pub async fn retry_with_backoff<F, Fut, T>(
    max_attempts: u32,
    base_delay: Duration,
    label: &str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                warn!("{} failed (attempt {}/{}): {}", label, attempt, max_attempts, e);
                tokio::time::sleep(base_delay * attempt).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    warn!("{} failed after {} attempts", label, attempt);
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn status_error() -> CollectError {
        CollectError::HttpStatus {
            url: "https://api.genius.com/search".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        }
    }

    #[tokio::test]
    async fn test_retries_fetch_errors_until_success() {
        let calls = AtomicU32::new(0);
        let out = retry_with_backoff(3, Duration::ZERO, "search", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(status_error())
            } else {
                Ok(7)
            }
        })
        .await
        .unwrap();
        assert_eq!(out, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let out: Result<()> = retry_with_backoff(2, Duration::ZERO, "search", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(status_error())
        })
        .await;
        assert!(matches!(out, Err(CollectError::HttpStatus { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let out: Result<()> = retry_with_backoff(3, Duration::ZERO, "page", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CollectError::HttpStatus {
                url: "https://genius.com/missing-lyrics".to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
        })
        .await;
        assert!(matches!(out, Err(CollectError::HttpStatus { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_structural_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let out: Result<()> = retry_with_backoff(5, Duration::ZERO, "page", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(CollectError::Extraction("no lyrics container".to_string()))
        })
        .await;
        assert!(matches!(out, Err(CollectError::Extraction(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
