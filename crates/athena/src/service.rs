//! The query-service seam: what the poller and the orchestrator need from a
//! SQL engine that runs statements asynchronously.

use std::fmt;

use async_trait::async_trait;
use aws_sdk_athena::types::{QueryExecution, QueryExecutionState};

use crate::client::AthenaError;

/// Opaque identifier of one submitted execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionHandle(String);

impl ExecutionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of an execution as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    /// A state this client does not know about. Treated as non-terminal.
    Unknown(String),
}

impl From<&QueryExecutionState> for ExecutionState {
    fn from(state: &QueryExecutionState) -> Self {
        match state {
            QueryExecutionState::Queued => Self::Queued,
            QueryExecutionState::Running => Self::Running,
            QueryExecutionState::Succeeded => Self::Succeeded,
            QueryExecutionState::Failed => Self::Failed,
            QueryExecutionState::Cancelled => Self::Cancelled,
            other => Self::Unknown(other.as_str().to_string()),
        }
    }
}

/// One status read: the state, the service's reason for the last state
/// change, and where results are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStatus {
    pub state: ExecutionState,
    pub reason: Option<String>,
    pub output_location: Option<String>,
}

impl ExecutionStatus {
    /// Extract the parts we care about from an SDK [`QueryExecution`].
    /// A missing state is read as `Queued`.
    pub fn from_sdk(qe: &QueryExecution) -> Self {
        let status = qe.status();
        Self {
            state: status
                .and_then(|s| s.state())
                .map(ExecutionState::from)
                .unwrap_or(ExecutionState::Queued),
            reason: status
                .and_then(|s| s.state_change_reason())
                .map(str::to_string),
            output_location: qe
                .result_configuration()
                .and_then(|rc| rc.output_location())
                .map(str::to_string),
        }
    }
}

/// A service that accepts SQL for asynchronous execution.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Submit `sql` and return immediately with its handle.
    async fn submit(&self, sql: &str) -> Result<ExecutionHandle, AthenaError>;

    /// Fetch the current status of a previously submitted execution.
    async fn status(&self, handle: &ExecutionHandle) -> Result<ExecutionStatus, AthenaError>;

    /// Ask the service to stop a running execution.
    async fn cancel(&self, handle: &ExecutionHandle) -> Result<(), AthenaError>;
}
