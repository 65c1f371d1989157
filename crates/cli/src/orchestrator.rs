//! The load run: materialize, wait, locate, notify, clean up.

use std::sync::Arc;

use dataload_athena::{
    build_ctas, temp_table_name, wait_for_completion, AthenaError, CtasOptions, ExecutionHandle,
    PollPolicy, QueryService,
};
use dataload_core::{LocationError, S3Location};
use dataload_notify::{IngestReceipt, IngestSink, NotifyError};
use tracing::{info, warn};

use crate::temp_table::TempTable;

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Athena(#[from] AthenaError),

    #[error("cannot locate query output: {0}")]
    Location(#[from] LocationError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub table: String,
    pub query_id: ExecutionHandle,
    pub location: S3Location,
    pub receipt: IngestReceipt,
}

impl RunReport {
    pub fn job_id(&self) -> Option<String> {
        self.receipt.job_id()
    }

    /// The line printed for the operator. Falls back to the raw response
    /// body when it carries no `jobId`.
    pub fn summary(&self) -> String {
        let job = self
            .job_id()
            .unwrap_or_else(|| self.receipt.body_text());
        format!("jobId:  {job}")
    }
}

/// Drives one query from submission to ingestion.
pub struct Orchestrator {
    queries: Arc<dyn QueryService>,
    sink: Arc<dyn IngestSink>,
    poll: PollPolicy,
    ctas: CtasOptions,
}

impl Orchestrator {
    pub fn new(queries: Arc<dyn QueryService>, sink: Arc<dyn IngestSink>) -> Self {
        Self {
            queries,
            sink,
            poll: PollPolicy::default(),
            ctas: CtasOptions::default(),
        }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn with_ctas_options(mut self, ctas: CtasOptions) -> Self {
        self.ctas = ctas;
        self
    }

    /// Materialize `sql` into a fresh temporary table, hand its output
    /// location to the ingestion sink and drop the table.
    ///
    /// The table is dropped on every path after the CTAS statement was
    /// accepted. A failed drop is logged and does not change the result.
    pub async fn run(&self, sql: &str) -> Result<RunReport, RunError> {
        let table_name = temp_table_name();
        let statement = build_ctas(&table_name, sql, &self.ctas)?;

        info!(table = %table_name, "submitting CTAS query");
        let handle = self.queries.submit(&statement).await?;
        let table = TempTable::new(table_name);

        let outcome = self.materialize_and_notify(&handle).await;

        let table_name = table.name().to_string();
        if let Err(e) = table.release(self.queries.as_ref(), &self.poll).await {
            warn!(table = %table_name, error = %e, "failed to drop temporary table");
        }

        let (location, receipt) = outcome?;
        Ok(RunReport {
            table: table_name,
            query_id: handle,
            location,
            receipt,
        })
    }

    async fn materialize_and_notify(
        &self,
        handle: &ExecutionHandle,
    ) -> Result<(S3Location, IngestReceipt), RunError> {
        let status = wait_for_completion(self.queries.as_ref(), handle, &self.poll).await?;

        let output = status
            .output_location
            .ok_or_else(|| AthenaError::MissingOutputLocation(handle.to_string()))?;
        let location = S3Location::parse(&output)?;
        info!(
            query_id = %handle,
            bucket = %location.bucket,
            path = %location.path,
            "query output located"
        );

        let receipt = self.sink.notify(&location).await?;
        info!(sink = self.sink.sink_name(), status = receipt.status, "ingestion notified");

        Ok((location, receipt))
    }
}
