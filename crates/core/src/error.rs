use thiserror::Error;

/// Problems with the environment-sourced configuration. Raised before any
/// network activity takes place.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(String),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: String, value: String },

    #[error("{0}")]
    Usage(String),
}

/// A storage URI that could not be split into bucket and key prefix.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocationError {
    #[error("malformed storage URI {uri}: {reason}")]
    Malformed { uri: String, reason: String },

    #[error("storage URI has no bucket: {0}")]
    MissingBucket(String),
}
