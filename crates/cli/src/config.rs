use dataload_athena::AthenaConfig;
use dataload_core::config::profiled_env_opt;
use dataload_core::ConfigError;
use dataload_notify::IngestConfig;

/// Env key holding the query used when `--query` is not given.
pub const QUERY_KEY: &str = "DATALOAD_QUERY";

const MISSING_QUERY: &str = "SQL query is required. Pass it on the command line, \
     e.g. athena-dataload -q \"SELECT * FROM table\", or set DATALOAD_QUERY.";

/// Everything one run needs, built once in `main` and handed to constructors.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub athena: AthenaConfig,
    pub ingest: IngestConfig,
}

impl RunConfig {
    pub fn from_env_profiled(profile: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            athena: AthenaConfig::from_env_profiled(profile)?,
            ingest: IngestConfig::from_env_profiled(profile)?,
        })
    }
}

/// Query from the command line, else the configured default, else a usage
/// error. Blank values count as absent.
pub fn resolve_query(cli: Option<&str>, configured: Option<&str>) -> Result<String, ConfigError> {
    [cli, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|q| !q.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::Usage(MISSING_QUERY.to_string()))
}

/// The configured default query for `profile`.
pub fn configured_query(profile: &str) -> Option<String> {
    profiled_env_opt(profile, QUERY_KEY)
}
