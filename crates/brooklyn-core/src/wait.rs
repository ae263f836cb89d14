//! Bounded polling with a fixed attempt count and a fixed interval.
//!
//! The probe is invoked at most `max_attempts` times. The interval is slept
//! between attempts only, never after the final one.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::error::{ApplicationError, Result};

/// Attempt budget used by [`wait_for`].
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Interval used by [`wait_for`].
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

/// Poll `probe` until it reports `true`.
///
/// A probe error is returned immediately and no further attempts are made.
/// When the budget runs out, [`ApplicationError::RetriesExceeded`] carries
/// `max_attempts`.
pub async fn wait_for_condition<F, Fut>(
    mut probe: F,
    max_attempts: u32,
    interval: Duration,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    for attempt in 1..=max_attempts {
        if probe().await? {
            debug!(attempt, max_attempts, "Condition reached");
            return Ok(());
        }
        debug!(attempt, max_attempts, "Condition not reached yet");
        if attempt < max_attempts {
            sleep(interval).await;
        }
    }
    Err(ApplicationError::RetriesExceeded {
        attempts: max_attempts,
    })
}

/// Like [`wait_for_condition`] for probes that cannot fail.
pub async fn wait_for_specific<F, Fut>(
    mut probe: F,
    max_attempts: u32,
    interval: Duration,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    wait_for_condition(
        || {
            let check = probe();
            async move { Ok::<_, ApplicationError>(check.await) }
        },
        max_attempts,
        interval,
    )
    .await
}

/// [`wait_for_specific`] with the default budget of 60 attempts, 3s apart.
pub async fn wait_for<F, Fut>(probe: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    wait_for_specific(probe, DEFAULT_MAX_ATTEMPTS, DEFAULT_INTERVAL).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    const INTERVAL: Duration = Duration::from_secs(2);

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_kth_attempt() {
        for max_attempts in 1..=6u32 {
            for k in 1..=max_attempts {
                let calls = AtomicU32::new(0);
                let started = Instant::now();

                let result = wait_for_specific(
                    || {
                        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                        async move { n == k }
                    },
                    max_attempts,
                    INTERVAL,
                )
                .await;

                assert!(result.is_ok());
                assert_eq!(calls.load(Ordering::SeqCst), k);
                assert_eq!(started.elapsed(), INTERVAL * (k - 1));
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exhausted() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = wait_for_specific(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { false }
            },
            4,
            INTERVAL,
        )
        .await;

        assert!(matches!(
            result,
            Err(ApplicationError::RetriesExceeded { attempts: 4 })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // no sleep after the last attempt
        assert_eq!(started.elapsed(), INTERVAL * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_exceeded_message_names_attempts() {
        let err = wait_for_specific(|| async { false }, 7, INTERVAL)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Maximum number of retries (7) exceeded");
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_error_fails_fast() {
        let calls = AtomicU32::new(0);

        let result = wait_for_condition(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 3 {
                        Err(ApplicationError::Render("probe exploded".into()))
                    } else {
                        Ok(false)
                    }
                }
            },
            50,
            INTERVAL,
        )
        .await;

        match result {
            Err(ApplicationError::Render(msg)) => assert_eq!(msg, "probe exploded"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempts_never_probes() {
        let calls = AtomicU32::new(0);
        let result = wait_for_specific(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { true }
            },
            0,
            INTERVAL,
        )
        .await;

        assert!(matches!(
            result,
            Err(ApplicationError::RetriesExceeded { attempts: 0 })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_budget() {
        let calls = AtomicU32::new(0);
        let started = Instant::now();

        let result = wait_for(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { false }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), DEFAULT_MAX_ATTEMPTS);
        assert_eq!(started.elapsed(), DEFAULT_INTERVAL * (DEFAULT_MAX_ATTEMPTS - 1));
    }
}
