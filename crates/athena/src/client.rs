//! AWS Athena query execution client.
//!
//! Provides [`AthenaClient`], the [`QueryService`] implementation backed by
//! the AWS SDK. Submission is fire-and-return; waiting for completion lives in
//! [`crate::poll`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::config::Credentials;
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::operation::start_query_execution::builders::StartQueryExecutionFluentBuilder;
use aws_sdk_athena::types::{
    EncryptionConfiguration, EncryptionOption, QueryExecutionContext, ResultConfiguration,
};
use aws_types::region::Region;
use tracing::{debug, info};

use crate::config::AthenaConfig;
use crate::service::{ExecutionHandle, ExecutionStatus, QueryService};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors that can occur during Athena operations.
#[derive(Debug, thiserror::Error)]
pub enum AthenaError {
    /// The service rejected the submission (network, auth, validation).
    #[error("Query submission failed: {0}")]
    Submit(String),

    /// Reading the status of an execution failed.
    #[error("Athena getQueryExecution error. QueryExecutionID: {query_id}: {message}")]
    StatusFetch { query_id: String, message: String },

    /// The query execution failed on the Athena side.
    #[error("Query {query_id} failed: {reason}")]
    QueryFailed { query_id: String, reason: String },

    /// The query was cancelled (either by the user or by Athena).
    #[error("Query {query_id} was cancelled")]
    QueryCancelled { query_id: String },

    /// The query did not reach a terminal state before the deadline.
    #[error("Query {query_id} timed out after {seconds}s")]
    QueryTimeout { query_id: String, seconds: u64 },

    /// A successful execution reported no output location.
    #[error("Query {0} succeeded but reported no output location")]
    MissingOutputLocation(String),

    /// The SQL handed in cannot be wrapped into a CTAS statement.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Any other AWS SDK error (stringified).
    #[error("AWS SDK error: {0}")]
    AwsSdk(String),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for submitting queries to AWS Athena.
///
/// Every submission carries the configured database, workgroup, output
/// location and encryption settings.
pub struct AthenaClient {
    config: AthenaConfig,
    athena_client: aws_sdk_athena::Client,
}

impl AthenaClient {
    /// Create a new [`AthenaClient`] from the given configuration.
    ///
    /// The AWS SDK config is loaded using the region specified in `config`.
    /// Static credentials from the config take precedence over the default
    /// provider chain.
    pub async fn new(config: AthenaConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some((key_id, secret)) = config.static_credentials() {
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "dataload-config",
            ));
        }

        let aws_cfg = loader.load().await;
        let athena_client = aws_sdk_athena::Client::new(&aws_cfg);

        info!(
            region = %config.region,
            database = %config.database,
            workgroup = %config.workgroup,
            output_location = %config.output_location,
            "AthenaClient initialised"
        );

        Self {
            config,
            athena_client,
        }
    }

    pub fn config(&self) -> &AthenaConfig {
        &self.config
    }

    fn result_configuration(&self) -> Result<ResultConfiguration, AthenaError> {
        let encryption = EncryptionConfiguration::builder()
            .encryption_option(EncryptionOption::from(self.config.encryption_option.as_str()))
            .set_kms_key(self.config.kms_key.clone())
            .build()
            .map_err(|e| AthenaError::Submit(e.to_string()))?;

        Ok(ResultConfiguration::builder()
            .output_location(&self.config.output_location)
            .encryption_configuration(encryption)
            .build())
    }

    fn start_request(&self, sql: &str) -> Result<StartQueryExecutionFluentBuilder, AthenaError> {
        Ok(self
            .athena_client
            .start_query_execution()
            .query_string(sql)
            .query_execution_context(
                QueryExecutionContext::builder()
                    .database(&self.config.database)
                    .build(),
            )
            .result_configuration(self.result_configuration()?)
            .work_group(&self.config.workgroup))
    }
}

#[async_trait]
impl QueryService for AthenaClient {
    async fn submit(&self, sql: &str) -> Result<ExecutionHandle, AthenaError> {
        debug!(sql = %sql, "Submitting Athena query");

        let resp = self
            .start_request(sql)?
            .send()
            .await
            .map_err(|e| AthenaError::Submit(DisplayErrorContext(&e).to_string()))?;

        let query_id = resp
            .query_execution_id()
            .ok_or_else(|| AthenaError::Submit("No query execution ID returned".into()))?;

        info!(query_id = %query_id, "Query execution started");
        Ok(ExecutionHandle::new(query_id))
    }

    async fn status(&self, handle: &ExecutionHandle) -> Result<ExecutionStatus, AthenaError> {
        let resp = self
            .athena_client
            .get_query_execution()
            .query_execution_id(handle.as_str())
            .send()
            .await
            .map_err(|e| AthenaError::StatusFetch {
                query_id: handle.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        let qe = resp.query_execution().ok_or_else(|| AthenaError::StatusFetch {
            query_id: handle.to_string(),
            message: "No query execution in response".into(),
        })?;

        Ok(ExecutionStatus::from_sdk(qe))
    }

    async fn cancel(&self, handle: &ExecutionHandle) -> Result<(), AthenaError> {
        info!(query_id = %handle, "Cancelling query");

        self.athena_client
            .stop_query_execution()
            .query_execution_id(handle.as_str())
            .send()
            .await
            .map_err(|e| AthenaError::AwsSdk(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests (no AWS calls)
// ---------------------------------------------------------------------------
