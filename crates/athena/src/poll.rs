//! Waiting for a submitted execution to reach a terminal state.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::client::AthenaError;
use crate::service::{ExecutionHandle, ExecutionState, ExecutionStatus, QueryService};

/// Upper bound for the backoff multiplier; keeps `Duration::mul_f64` sane.
const MAX_BACKOFF_FACTOR: f64 = 10.0;

/// How often to check an execution and for how long.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Delay before the first check.
    pub interval: Duration,
    /// Ceiling for the delay once backoff kicks in.
    pub max_interval: Duration,
    /// 1.0 keeps the interval fixed.
    pub backoff_factor: f64,
    /// Deadline measured from the start of polling.
    pub timeout: Duration,
}

impl PollPolicy {
    pub fn new(
        interval: Duration,
        max_interval: Duration,
        backoff_factor: f64,
        timeout: Duration,
    ) -> Self {
        Self {
            interval,
            max_interval: max_interval.max(interval),
            backoff_factor: backoff_factor.clamp(1.0, MAX_BACKOFF_FACTOR),
            timeout,
        }
    }

    /// A fixed interval with the given deadline.
    pub fn fixed(interval: Duration, timeout: Duration) -> Self {
        Self::new(interval, interval, 1.0, timeout)
    }

    fn next_delay(&self, current: Duration) -> Duration {
        current.mul_f64(self.backoff_factor).min(self.max_interval)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_millis(200), Duration::from_secs(300))
    }
}

/// Poll `service` until `handle` succeeds, fails, is cancelled or the
/// policy's deadline passes.
///
/// Returns the final status on `SUCCEEDED`. `FAILED` becomes
/// [`AthenaError::QueryFailed`] carrying the service's reason verbatim.
/// On timeout the execution is cancelled best-effort and
/// [`AthenaError::QueryTimeout`] is returned. Status-fetch errors end polling
/// immediately.
pub async fn wait_for_completion<S>(
    service: &S,
    handle: &ExecutionHandle,
    policy: &PollPolicy,
) -> Result<ExecutionStatus, AthenaError>
where
    S: QueryService + ?Sized,
{
    let start = Instant::now();
    let mut delay = policy.interval;

    loop {
        tokio::time::sleep(delay).await;

        let status = service.status(handle).await?;

        debug!(
            query_id = %handle,
            state = ?status.state,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Polling query status"
        );

        match status.state {
            ExecutionState::Succeeded => return Ok(status),

            ExecutionState::Failed => {
                let reason = status.reason.unwrap_or_else(|| "unknown".to_string());
                error!(query_id = %handle, reason = %reason, "Query failed");
                return Err(AthenaError::QueryFailed {
                    query_id: handle.to_string(),
                    reason,
                });
            }

            ExecutionState::Cancelled => {
                warn!(query_id = %handle, "Query was cancelled");
                return Err(AthenaError::QueryCancelled {
                    query_id: handle.to_string(),
                });
            }

            ExecutionState::Queued | ExecutionState::Running | ExecutionState::Unknown(_) => {}
        }

        if start.elapsed() >= policy.timeout {
            warn!(
                query_id = %handle,
                timeout_seconds = policy.timeout.as_secs(),
                "Query timed out, cancelling"
            );
            if let Err(e) = service.cancel(handle).await {
                warn!(query_id = %handle, error = %e, "Cancel after timeout failed");
            }
            return Err(AthenaError::QueryTimeout {
                query_id: handle.to_string(),
                seconds: policy.timeout.as_secs(),
            });
        }

        delay = policy.next_delay(delay);
    }
}
