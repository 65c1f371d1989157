//! Tests for wait_for_completion against a scripted query service.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dataload_athena::*;

/// Replays a fixed sequence of states, repeating the last one forever.
struct ScriptedService {
    states: Mutex<VecDeque<ExecutionStatus>>,
    polls: Mutex<usize>,
    cancels: Mutex<usize>,
}

impl ScriptedService {
    fn new(states: Vec<ExecutionStatus>) -> Self {
        Self {
            states: Mutex::new(states.into()),
            polls: Mutex::new(0),
            cancels: Mutex::new(0),
        }
    }

    fn polls(&self) -> usize {
        *self.polls.lock().unwrap()
    }

    fn cancels(&self) -> usize {
        *self.cancels.lock().unwrap()
    }
}

#[async_trait]
impl QueryService for ScriptedService {
    async fn submit(&self, _sql: &str) -> Result<ExecutionHandle, AthenaError> {
        Ok(ExecutionHandle::new("q-1"))
    }

    async fn status(&self, _handle: &ExecutionHandle) -> Result<ExecutionStatus, AthenaError> {
        *self.polls.lock().unwrap() += 1;
        let mut states = self.states.lock().unwrap();
        let next = if states.len() > 1 {
            states.pop_front().unwrap()
        } else {
            states.front().cloned().unwrap()
        };
        Ok(next)
    }

    async fn cancel(&self, _handle: &ExecutionHandle) -> Result<(), AthenaError> {
        *self.cancels.lock().unwrap() += 1;
        Ok(())
    }
}

struct BrokenService;

#[async_trait]
impl QueryService for BrokenService {
    async fn submit(&self, _sql: &str) -> Result<ExecutionHandle, AthenaError> {
        Err(AthenaError::Submit("denied".into()))
    }

    async fn status(&self, handle: &ExecutionHandle) -> Result<ExecutionStatus, AthenaError> {
        Err(AthenaError::StatusFetch {
            query_id: handle.to_string(),
            message: "connection reset".into(),
        })
    }

    async fn cancel(&self, _handle: &ExecutionHandle) -> Result<(), AthenaError> {
        Ok(())
    }
}

fn state(state: ExecutionState) -> ExecutionStatus {
    ExecutionStatus {
        state,
        reason: None,
        output_location: None,
    }
}

fn succeeded(location: &str) -> ExecutionStatus {
    ExecutionStatus {
        state: ExecutionState::Succeeded,
        reason: None,
        output_location: Some(location.to_string()),
    }
}

#[tokio::test(start_paused = true)]
async fn waits_through_queued_and_running() {
    let service = ScriptedService::new(vec![
        state(ExecutionState::Queued),
        state(ExecutionState::Running),
        state(ExecutionState::Unknown("PAUSED".into())),
        state(ExecutionState::Running),
        succeeded("s3://results-bucket/athenaresult/q-1/"),
    ]);
    let handle = ExecutionHandle::new("q-1");

    let status = wait_for_completion(&service, &handle, &PollPolicy::default())
        .await
        .expect("succeeds");

    assert_eq!(status.state, ExecutionState::Succeeded);
    assert_eq!(
        status.output_location.as_deref(),
        Some("s3://results-bucket/athenaresult/q-1/")
    );
    assert_eq!(service.polls(), 5);
    assert_eq!(service.cancels(), 0);
}

#[tokio::test(start_paused = true)]
async fn failure_reason_is_reported_verbatim() {
    let service = ScriptedService::new(vec![
        state(ExecutionState::Running),
        ExecutionStatus {
            state: ExecutionState::Failed,
            reason: Some("Syntax error".into()),
            output_location: None,
        },
    ]);

    let err = wait_for_completion(&service, &ExecutionHandle::new("q-1"), &PollPolicy::default())
        .await
        .unwrap_err();

    match &err {
        AthenaError::QueryFailed { query_id, reason } => {
            assert_eq!(query_id, "q-1");
            assert_eq!(reason, "Syntax error");
        }
        other => panic!("expected QueryFailed, got {other:?}"),
    }
    assert!(err.to_string().contains("Syntax error"));
}

#[tokio::test(start_paused = true)]
async fn cancelled_is_terminal() {
    let service = ScriptedService::new(vec![state(ExecutionState::Cancelled)]);

    let err = wait_for_completion(&service, &ExecutionHandle::new("q-1"), &PollPolicy::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AthenaError::QueryCancelled { .. }));
    assert_eq!(service.polls(), 1);
}

#[tokio::test(start_paused = true)]
async fn running_forever_times_out_and_cancels() {
    let service = ScriptedService::new(vec![state(ExecutionState::Running)]);
    let policy = PollPolicy::fixed(Duration::from_millis(200), Duration::from_secs(2));

    let err = wait_for_completion(&service, &ExecutionHandle::new("q-1"), &policy)
        .await
        .unwrap_err();

    match err {
        AthenaError::QueryTimeout { query_id, seconds } => {
            assert_eq!(query_id, "q-1");
            assert_eq!(seconds, 2);
        }
        other => panic!("expected QueryTimeout, got {other:?}"),
    }
    assert_eq!(service.polls(), 10);
    assert_eq!(service.cancels(), 1);
}

#[tokio::test(start_paused = true)]
async fn status_errors_stop_polling() {
    let err = wait_for_completion(
        &BrokenService,
        &ExecutionHandle::new("q-7"),
        &PollPolicy::default(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("q-7"));
    assert!(err.to_string().contains("connection reset"));
}

#[tokio::test(start_paused = true)]
async fn works_through_trait_object() {
    let service: Box<dyn QueryService> =
        Box::new(ScriptedService::new(vec![succeeded("s3://b/p/")]));

    let status = wait_for_completion(
        service.as_ref(),
        &ExecutionHandle::new("q-1"),
        &PollPolicy::default(),
    )
    .await
    .unwrap();
    assert_eq!(status.output_location.as_deref(), Some("s3://b/p/"));
}
