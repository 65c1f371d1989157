use std::fmt;

use dataload_core::config::{
    active_profile, profiled_env_bool, profiled_env_or, profiled_env_required, profiled_env_u64,
};
use dataload_core::ConfigError;

use crate::payload::DatasetContext;

const DEFAULT_PATH: &str = "/Prod/dataload/init";

/// What to do with a non-2xx answer from the ingestion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Non-2xx is an error.
    RequireSuccess,
    /// Any answer with a body counts, non-2xx is only logged.
    AcceptAny,
}

/// Ingestion endpoint and dataset identifiers.
///
/// Reads from environment variables with optional profile prefix, like
/// every other config in the workspace.
#[derive(Clone)]
pub struct IngestConfig {
    /// Bare hostname (`https://` is assumed) or a full base URL.
    pub host: String,
    pub path: String,
    pub api_key: String,
    pub dataset: DatasetContext,
    pub status_policy: StatusPolicy,
    pub timeout_seconds: u64,
}

impl IngestConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_profiled(&active_profile())
    }

    /// `INGEST_HOST`, `INGEST_API_KEY` and `INGEST_METADATA_ID` are required.
    pub fn from_env_profiled(profile: &str) -> Result<Self, ConfigError> {
        let accept_any = profiled_env_bool(profile, "INGEST_ACCEPT_NON_2XX", false);

        Ok(Self {
            host: profiled_env_required(profile, "INGEST_HOST")?,
            path: profiled_env_or(profile, "INGEST_PATH", DEFAULT_PATH),
            api_key: profiled_env_required(profile, "INGEST_API_KEY")?,
            dataset: DatasetContext {
                dataset_id: profiled_env_or(profile, "INGEST_DATASET_ID", "ds"),
                metadata_id: profiled_env_required(profile, "INGEST_METADATA_ID")?,
                datasource_id: profiled_env_or(profile, "INGEST_DATASOURCE_ID", "dsource"),
                app_id: profiled_env_or(profile, "INGEST_APP_ID", "appid"),
                connector_id: profiled_env_or(profile, "INGEST_CONNECTOR_ID", "connector"),
                connector_name: profiled_env_or(
                    profile,
                    "INGEST_CONNECTOR_NAME",
                    "JSON File Connector",
                ),
            },
            status_policy: if accept_any {
                StatusPolicy::AcceptAny
            } else {
                StatusPolicy::RequireSuccess
            },
            timeout_seconds: profiled_env_u64(profile, "INGEST_TIMEOUT_SECONDS", 30),
        })
    }

    /// Full URL of the data-load endpoint.
    pub fn endpoint_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        let base = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        }
    }
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestConfig")
            .field("host", &self.host)
            .field("path", &self.path)
            .field("api_key", &"<redacted>")
            .field("dataset", &self.dataset)
            .field("status_policy", &self.status_policy)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}
