use std::fmt;
use std::time::Duration;

use dataload_core::config::{
    active_profile, profiled_env_f64, profiled_env_opt, profiled_env_or, profiled_env_u32,
    profiled_env_u64,
};
use dataload_core::{ConfigError, S3Location};
use crate::ctas::CtasOptions;
use crate::poll::PollPolicy;

/// Key prefix under the results bucket where Athena writes its output.
const RESULTS_PREFIX: &str = "athenaresult/";

/// Encryption modes Athena accepts for query results.
const ENCRYPTION_OPTIONS: &[&str] = &["SSE_S3", "SSE_KMS", "CSE_KMS"];

/// Modes that need a KMS key alongside them.
const KMS_ENCRYPTION_OPTIONS: &[&str] = &["SSE_KMS", "CSE_KMS"];

// ── AthenaConfig ─────────────────────────────────────────────────

/// Configuration for the Athena side of a load run.
///
/// Reads from environment variables with optional profile prefix.
/// When `DATALOAD_PROFILE=PROD`, checks `PROD_ATHENA_DATABASE` before `ATHENA_DATABASE`.
#[derive(Clone)]
pub struct AthenaConfig {
    /// AWS region for Athena queries.
    pub region: String,
    /// Static access key; when absent the default AWS credential chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Athena database (catalog schema) the queries run against.
    pub database: String,
    /// Athena workgroup.
    pub workgroup: String,
    /// S3 URI for query results.
    pub output_location: String,
    /// `SSE_S3`, `SSE_KMS` or `CSE_KMS`.
    pub encryption_option: String,
    /// KMS key ARN or id, required for `SSE_KMS` and `CSE_KMS`.
    pub kms_key: Option<String>,
    /// Upper bound on how long a single query may run.
    pub timeout_seconds: u32,
    pub poll_interval_ms: u64,
    pub poll_max_interval_ms: u64,
    /// Multiplier applied to the poll interval after every check (1.0 = fixed).
    pub poll_backoff: f64,
    /// Storage format of the temporary CTAS table.
    pub ctas_format: String,
    pub ctas_bucket_count: u32,
}

impl AthenaConfig {
    /// Build config from environment variables using the active profile.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_profiled(&active_profile())
    }

    /// Build config for a specific named profile.
    ///
    /// `ATHENA_REGION` falls back to `AWS_REGION` before using the default.
    /// The output location is `ATHENA_OUTPUT_LOCATION` when set, otherwise
    /// derived from `DATA_RESULTS_BUCKET`.
    pub fn from_env_profiled(profile: &str) -> Result<Self, ConfigError> {
        let region = profiled_env_opt(profile, "ATHENA_REGION")
            .or_else(|| profiled_env_opt(profile, "AWS_REGION"))
            .unwrap_or_else(|| "us-east-1".to_string());

        let output_location = match profiled_env_opt(profile, "ATHENA_OUTPUT_LOCATION") {
            Some(loc) => loc,
            None => {
                let bucket = profiled_env_opt(profile, "DATA_RESULTS_BUCKET")
                    .ok_or_else(|| ConfigError::Missing("DATA_RESULTS_BUCKET".into()))?;
                output_location_for_bucket(&bucket)
            }
        };

        let cfg = Self {
            region,
            access_key_id: profiled_env_opt(profile, "AWS_ACCESS_KEY_ID"),
            secret_access_key: profiled_env_opt(profile, "AWS_SECRET_ACCESS_KEY"),
            database: profiled_env_or(profile, "ATHENA_DATABASE", "default"),
            workgroup: profiled_env_or(profile, "ATHENA_WORKGROUP", "primary"),
            output_location,
            encryption_option: profiled_env_or(profile, "ATHENA_ENCRYPTION_OPTION", "SSE_S3")
                .to_uppercase(),
            kms_key: profiled_env_opt(profile, "ATHENA_KMS_KEY"),
            timeout_seconds: profiled_env_u32(profile, "ATHENA_TIMEOUT_SECONDS", 300),
            poll_interval_ms: profiled_env_u64(profile, "ATHENA_POLL_INTERVAL_MS", 200),
            poll_max_interval_ms: profiled_env_u64(profile, "ATHENA_POLL_MAX_INTERVAL_MS", 2000),
            poll_backoff: profiled_env_f64(profile, "ATHENA_POLL_BACKOFF", 1.0),
            ctas_format: profiled_env_or(profile, "ATHENA_CTAS_FORMAT", "JSON"),
            ctas_bucket_count: profiled_env_u32(profile, "ATHENA_CTAS_BUCKET_COUNT", 100),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject settings Athena would refuse at submission time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.output_location.starts_with("s3://")
            || S3Location::parse(&self.output_location).is_err()
        {
            return Err(ConfigError::Invalid {
                key: "ATHENA_OUTPUT_LOCATION".into(),
                value: self.output_location.clone(),
            });
        }
        if !ENCRYPTION_OPTIONS.contains(&self.encryption_option.as_str()) {
            return Err(ConfigError::Invalid {
                key: "ATHENA_ENCRYPTION_OPTION".into(),
                value: self.encryption_option.clone(),
            });
        }
        if KMS_ENCRYPTION_OPTIONS.contains(&self.encryption_option.as_str())
            && self.kms_key.is_none()
        {
            return Err(ConfigError::Missing("ATHENA_KMS_KEY".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "ATHENA_POLL_INTERVAL_MS".into(),
                value: "0".into(),
            });
        }
        if self.ctas_bucket_count == 0 {
            return Err(ConfigError::Invalid {
                key: "ATHENA_CTAS_BUCKET_COUNT".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }

    /// Static credentials, only when both halves are configured.
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(
            Duration::from_millis(self.poll_interval_ms),
            Duration::from_millis(self.poll_max_interval_ms),
            self.poll_backoff,
            Duration::from_secs(self.timeout_seconds as u64),
        )
    }

    pub fn ctas_options(&self) -> CtasOptions {
        CtasOptions {
            format: self.ctas_format.clone(),
            bucket_count: self.ctas_bucket_count,
        }
    }
}

impl fmt::Debug for AthenaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AthenaConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("database", &self.database)
            .field("workgroup", &self.workgroup)
            .field("output_location", &self.output_location)
            .field("encryption_option", &self.encryption_option)
            .field("kms_key", &self.kms_key)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("poll_max_interval_ms", &self.poll_max_interval_ms)
            .field("poll_backoff", &self.poll_backoff)
            .field("ctas_format", &self.ctas_format)
            .field("ctas_bucket_count", &self.ctas_bucket_count)
            .finish()
    }
}

/// `s3://<bucket>/athenaresult/`
pub fn output_location_for_bucket(bucket: &str) -> String {
    let bucket = bucket.trim_start_matches("s3://").trim_end_matches('/');
    format!("s3://{}/{}", bucket, RESULTS_PREFIX)
}

// ── Tests ────────────────────────────────────────────────────────
