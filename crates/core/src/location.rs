//! Storage URI → (bucket, key prefix) splitting.

use std::fmt;

use url::Url;

use crate::error::LocationError;

/// Bucket and key prefix of an object-store location such as an Athena
/// query's output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Location {
    pub bucket: String,
    /// Key prefix without the leading `/`. Trailing content is preserved.
    pub path: String,
}

impl S3Location {
    /// Split `uri` into its host component and its path, stripping the single
    /// leading separator from the path.
    ///
    /// ```
    /// use dataload_core::S3Location;
    ///
    /// let loc = S3Location::parse("s3://mybucket/results/2024/out/").unwrap();
    /// assert_eq!(loc.bucket, "mybucket");
    /// assert_eq!(loc.path, "results/2024/out/");
    /// ```
    pub fn parse(uri: &str) -> Result<Self, LocationError> {
        let url = Url::parse(uri.trim()).map_err(|e| LocationError::Malformed {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;

        let bucket = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(LocationError::MissingBucket(uri.to_string())),
        };

        let path = url.path();
        let path = path.strip_prefix('/').unwrap_or(path).to_string();

        Ok(Self { bucket, path })
    }

    /// Render back to `s3://bucket/path`.
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.path)
    }
}

impl fmt::Display for S3Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}
