//! Poll execution engine with policy-based configuration
//!
//! This module provides a reusable polling loop for wait-until-ready
//! operations: an async condition is probed at a fixed interval until it
//! reports ready, the configured attempt bound is reached, or the loop is
//! cancelled through a [`CancellationToken`].
//!
//! Probe errors are never retried; only negative probes are repeated.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Polling policy for wait-until-ready operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PollPolicy {
    /// Delay between probes in milliseconds
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Maximum number of probes; `None` polls until ready
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            max_attempts: None,
        }
    }
}

fn default_interval() -> u64 {
    300
}

impl PollPolicy {
    /// Create a policy with the given probe interval and no attempt bound
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            max_attempts: None,
        }
    }

    /// Limit the number of probes
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Delay between probes as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Errors that can occur during poll execution
///
/// The error type is generic over `E`, the underlying error type from the
/// probe being polled.
#[derive(Debug)]
pub enum PollError<E> {
    /// The configured attempt bound was reached before the condition held
    Exhausted {
        /// Number of probes made before giving up
        attempts: u32,
        /// Total duration spent across all probes
        total_duration: Duration,
    },

    /// The poll was cancelled through its `CancellationToken`
    Cancelled {
        /// Number of probes made before cancellation
        attempts: u32,
    },

    /// A probe failed
    Probe(E),
}

impl<E: fmt::Display> fmt::Display for PollError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollError::Exhausted {
                attempts,
                total_duration,
            } => {
                write!(
                    f,
                    "poll exhausted after {} attempts over {:.2}s",
                    attempts,
                    total_duration.as_secs_f64()
                )
            }
            PollError::Cancelled { attempts } => {
                write!(f, "poll cancelled after {} attempts", attempts)
            }
            PollError::Probe(source) => {
                write!(f, "poll probe failed: {}", source)
            }
        }
    }
}

impl<E: Error + 'static> Error for PollError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PollError::Probe(source) => Some(source),
            _ => None,
        }
    }
}

impl<E> PollError<E> {
    /// Create a new exhausted error
    pub fn exhausted(attempts: u32, total_duration: Duration) -> Self {
        PollError::Exhausted {
            attempts,
            total_duration,
        }
    }

    /// Create a new cancelled error
    pub fn cancelled(attempts: u32) -> Self {
        PollError::Cancelled { attempts }
    }

    /// Get the number of probes made
    pub fn attempts(&self) -> u32 {
        match self {
            PollError::Exhausted { attempts, .. } => *attempts,
            PollError::Cancelled { attempts } => *attempts,
            PollError::Probe(_) => 1,
        }
    }

    /// Check if this error indicates the attempt bound was reached
    pub fn is_exhausted(&self) -> bool {
        matches!(self, PollError::Exhausted { .. })
    }

    /// Check if this error indicates cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PollError::Cancelled { .. })
    }

    /// Get the underlying probe error, consuming this error
    pub fn into_source(self) -> Option<E> {
        match self {
            PollError::Probe(source) => Some(source),
            _ => None,
        }
    }
}

/// Probe an async condition until it reports ready
///
/// Each probe returns `Ok(true)` when the awaited condition holds,
/// `Ok(false)` to keep waiting, or `Err` to abort the poll. The loop
/// suspends between probes with no resources held; cancellation is
/// observed while suspended, an in-flight probe runs to completion.
///
/// # Arguments
///
/// * `policy` - The polling policy to use
/// * `cancel` - Token that stops the loop cooperatively
/// * `op` - A closure that returns a future representing one probe
pub async fn poll_until<F, Fut, E>(
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<(), PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let start = Instant::now();
    let mut attempts = 0u32;

    loop {
        if cancel.is_cancelled() {
            return Err(PollError::cancelled(attempts));
        }

        attempts += 1;
        match op().await {
            Ok(true) => {
                debug!(
                    attempts,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "poll condition met"
                );
                return Ok(());
            }
            Ok(false) => {
                debug!(attempt = attempts, "poll condition not met yet");
            }
            Err(err) => return Err(PollError::Probe(err)),
        }

        if let Some(max) = policy.max_attempts {
            if attempts >= max {
                return Err(PollError::exhausted(attempts, start.elapsed()));
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(PollError::cancelled(attempts));
            }
            _ = tokio::time::sleep(policy.interval()) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn test_policy() -> PollPolicy {
        PollPolicy::new(10) // Short delays for tests
    }

    #[tokio::test]
    async fn test_immediate_ready() {
        let policy = test_policy();
        let cancel = CancellationToken::new();

        let result: Result<(), PollError<io::Error>> =
            poll_until(&policy, &cancel, || async { Ok(true) }).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_ready_after_negative_probes() {
        let policy = test_policy();
        let cancel = CancellationToken::new();
        let probes = Arc::new(AtomicU32::new(0));
        let probes_clone = probes.clone();

        let result: Result<(), PollError<io::Error>> = poll_until(&policy, &cancel, || {
            let probes = probes_clone.clone();
            async move {
                let probe = probes.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(probe >= 3)
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(probes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_bounded_poll_exhaustion() {
        let policy = test_policy().with_max_attempts(3);
        let cancel = CancellationToken::new();
        let probes = Arc::new(AtomicU32::new(0));
        let probes_clone = probes.clone();

        let result: Result<(), PollError<io::Error>> = poll_until(&policy, &cancel, || {
            let probes = probes_clone.clone();
            async move {
                probes.fetch_add(1, Ordering::SeqCst);
                Ok(false)
            }
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(err.attempts(), 3);
        assert_eq!(probes.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_probe_error_aborts() {
        let policy = test_policy();
        let cancel = CancellationToken::new();
        let probes = Arc::new(AtomicU32::new(0));
        let probes_clone = probes.clone();

        let result: Result<(), PollError<io::Error>> = poll_until(&policy, &cancel, || {
            let probes = probes_clone.clone();
            async move {
                let probe = probes.fetch_add(1, Ordering::SeqCst) + 1;
                if probe < 2 {
                    Ok(false)
                } else {
                    Err(io::Error::new(io::ErrorKind::PermissionDenied, "forbidden"))
                }
            }
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, PollError::Probe(_)));
        assert_eq!(probes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_probe() {
        let policy = test_policy();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let probes = Arc::new(AtomicU32::new(0));
        let probes_clone = probes.clone();

        let result: Result<(), PollError<io::Error>> = poll_until(&policy, &cancel, || {
            let probes = probes_clone.clone();
            async move {
                probes.fetch_add(1, Ordering::SeqCst);
                Ok(false)
            }
        })
        .await;

        let err = result.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.attempts(), 0);
        assert_eq!(probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancelled_between_probes() {
        let policy = PollPolicy::new(5000);
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let start = Instant::now();
        let result: Result<(), PollError<io::Error>> =
            poll_until(&policy, &cancel, || async { Ok(false) }).await;

        let err = result.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.attempts(), 1);
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_policy_defaults() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval_ms, 300);
        assert_eq!(policy.max_attempts, None);
        assert_eq!(policy.interval(), Duration::from_millis(300));
    }

    #[test]
    fn test_exhausted_display() {
        let err: PollError<io::Error> = PollError::exhausted(4, Duration::from_secs(2));
        let display = format!("{}", err);
        assert!(display.contains("poll exhausted"));
        assert!(display.contains("4 attempts"));
    }

    #[test]
    fn test_into_source() {
        let err: PollError<io::Error> =
            PollError::Probe(io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(err.into_source().is_some());

        let err: PollError<io::Error> = PollError::cancelled(1);
        assert!(err.into_source().is_none());
    }
}
