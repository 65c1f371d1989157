//! HTTP data-load notifier.
//!
//! Posts a [`DataloadRequest`] for the located result files to the ingestion
//! API and hands back the raw response.

use std::fmt;
use std::time::Duration;

use dataload_core::S3Location;
use tracing::{debug, info, warn};

use crate::config::{IngestConfig, StatusPolicy};
use crate::payload::{DataloadRequest, DatasetContext};
use crate::traits::{IngestReceipt, IngestSink, NotifyError};

const API_KEY_HEADER: &str = "x-api-key";

/// Sends one POST per notification to the configured endpoint.
pub struct HttpIngestNotifier {
    url: reqwest::Url,
    api_key: String,
    dataset: DatasetContext,
    status_policy: StatusPolicy,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl HttpIngestNotifier {
    /// Build a notifier from config. The endpoint URL is validated here so a
    /// bad host fails before any query is submitted.
    pub fn new(config: &IngestConfig) -> Result<Self, NotifyError> {
        let endpoint = config.endpoint_url();
        let url = reqwest::Url::parse(&endpoint)
            .map_err(|e| NotifyError::Config(format!("invalid ingestion URL {endpoint}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            url,
            api_key: config.api_key.clone(),
            dataset: config.dataset.clone(),
            status_policy: config.status_policy,
            client,
        })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }
}

impl fmt::Debug for HttpIngestNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpIngestNotifier")
            .field("url", &self.url.as_str())
            .field("api_key", &"<redacted>")
            .field("dataset", &self.dataset)
            .field("status_policy", &self.status_policy)
            .finish()
    }
}

#[async_trait::async_trait]
impl IngestSink for HttpIngestNotifier {
    async fn notify(&self, location: &S3Location) -> Result<IngestReceipt, NotifyError> {
        let request = DataloadRequest::for_location(&self.dataset, location);
        let body = serde_json::to_vec(&request)?;

        info!(
            url = %self.url,
            bucket = %location.bucket,
            path = %location.path,
            "requesting data load"
        );

        let response = self
            .client
            .post(self.url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, self.api_key.as_str())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body_text = String::from_utf8_lossy(&bytes).into_owned();
            match self.status_policy {
                StatusPolicy::RequireSuccess => {
                    warn!(url = %self.url, %status, body = %body_text, "ingestion returned non-2xx status");
                    return Err(NotifyError::Status {
                        status: status.as_u16(),
                        body: body_text,
                    });
                }
                StatusPolicy::AcceptAny => {
                    warn!(
                        url = %self.url,
                        %status,
                        body = %body_text,
                        "ingestion returned non-2xx status, accepting per config"
                    );
                }
            }
        }

        debug!(url = %self.url, %status, bytes = bytes.len(), "data load requested");

        Ok(IngestReceipt {
            status: status.as_u16(),
            body: bytes,
        })
    }

    fn sink_name(&self) -> &str {
        "http"
    }
}
