//! Unit tests for the retry executor

use backon::BackoffBuilder;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use zerozoro::core::retry::{RetryClassify, RetryExecutor, RetryPolicy};
use zerozoro::services::ServiceError;

fn fast_policy(retries: usize) -> RetryPolicy {
    RetryPolicy {
        retries,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(4),
        ..RetryPolicy::default()
    }
}

fn unavailable() -> ServiceError {
    ServiceError::Status {
        service: "test",
        status: 503,
    }
}

#[derive(Debug)]
struct Flaky {
    transient: bool,
}

impl fmt::Display for Flaky {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flaky(transient={})", self.transient)
    }
}

impl RetryClassify for Flaky {
    fn is_transient(&self) -> bool {
        self.transient
    }
}

#[test]
fn test_default_policy() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.retries, 5);
    assert_eq!(policy.base_delay, Duration::from_millis(1500));
    assert_eq!(policy.max_delay, Duration::from_secs(20));
    assert_eq!(policy.jitter, 0.3);
    assert_eq!(policy.retry_on_status, vec![429, 500, 502, 503, 504]);
}

#[test]
fn test_nominal_delays_double_until_capped() {
    let policy = RetryPolicy::default();
    let delays: Vec<Duration> = (1..=6).map(|a| policy.nominal_delay(a)).collect();
    assert_eq!(
        delays,
        vec![
            Duration::from_millis(1500),
            Duration::from_millis(3000),
            Duration::from_millis(6000),
            Duration::from_millis(12000),
            Duration::from_secs(20),
            Duration::from_secs(20),
        ]
    );
    assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(policy.nominal_delay(200), Duration::from_secs(20));
}

#[test]
fn test_jitter_stays_within_band() {
    let policy = RetryPolicy::default();
    let base = Duration::from_millis(1000);
    for _ in 0..200 {
        let d = policy.jittered(base);
        assert!(d >= Duration::from_millis(700), "{:?}", d);
        assert!(d <= Duration::from_millis(1300), "{:?}", d);
    }

    let exact = RetryPolicy {
        jitter: 0.0,
        ..RetryPolicy::default()
    };
    assert_eq!(exact.jittered(base), base);
}

#[test]
fn test_backoff_yields_one_delay_per_retry() {
    let delays: Vec<Duration> = fast_policy(4).build().collect();
    assert_eq!(delays.len(), 4);
    assert!(delays.iter().all(|d| *d <= Duration::from_micros(5200)));
}

#[test]
fn test_status_classification() {
    let policy = RetryPolicy::default();
    assert!(policy.is_retryable(&unavailable()));
    assert!(policy.is_retryable(&ServiceError::Status {
        service: "test",
        status: 429
    }));
    assert!(!policy.is_retryable(&ServiceError::Status {
        service: "test",
        status: 404
    }));
    assert!(!policy.is_retryable(&ServiceError::Malformed("bad".to_string())));
}

#[tokio::test]
async fn test_persistent_retryable_failure_runs_retries_plus_final_attempt() {
    let executor = RetryExecutor::new(fast_policy(3));
    let calls = AtomicUsize::new(0);

    let result: Result<(), ServiceError> = executor
        .run("test.op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(unavailable())
        })
        .await;

    assert!(matches!(result, Err(ServiceError::Status { status: 503, .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_non_retryable_failure_runs_once() {
    let executor = RetryExecutor::new(fast_policy(5));
    let calls = AtomicUsize::new(0);

    let result: Result<(), ServiceError> = executor
        .run("test.op", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ServiceError::Status {
                service: "test",
                status: 400,
            })
        })
        .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_recovers_after_transient_failures() {
    let executor = RetryExecutor::new(fast_policy(5));
    let calls = AtomicUsize::new(0);

    let result = executor
        .run("test.op", || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(Flaky { transient: true })
            } else {
                Ok(n)
            }
        })
        .await;

    assert_eq!(result.unwrap(), 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_generic_error_classification() {
    let executor = RetryExecutor::new(fast_policy(2));
    let calls = AtomicUsize::new(0);

    let result: Result<(), Flaky> = tokio_test::block_on(executor.run("test.flaky", || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(Flaky { transient: false })
    }));

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
