//! IngestSink trait definition and shared error types.

use bytes::Bytes;
use dataload_core::S3Location;

/// Errors that can occur while notifying the ingestion service.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("ingestion endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What the ingestion service answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub status: u16,
    /// Raw response body, unparsed.
    pub body: Bytes,
}

impl IngestReceipt {
    /// The `jobId` field of a JSON response body, if there is one.
    pub fn job_id(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_slice(&self.body).ok()?;
        match value.get("jobId")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A destination that starts loading the files under a storage location.
#[async_trait::async_trait]
pub trait IngestSink: Send + Sync {
    async fn notify(&self, location: &S3Location) -> Result<IngestReceipt, NotifyError>;

    /// Human-readable name for logs.
    fn sink_name(&self) -> &str;
}
