//! Configuration for the snapshot exporter
//!
//! All runtime configuration comes from the environment:
//! - `TABLE_NAME`: source DynamoDB table (required)
//! - `BUCKET_NAME`: destination S3 bucket (required)
//!
//! Missing or empty variables are a fatal startup error, checked before any
//! read or write is attempted. The destination key and content type are
//! fixed constants: every invocation overwrites the same object.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Environment variable naming the source table
pub const TABLE_NAME_VAR: &str = "TABLE_NAME";

/// Environment variable naming the destination bucket
pub const BUCKET_NAME_VAR: &str = "BUCKET_NAME";

/// Destination object key. Fixed: each invocation overwrites the previous
/// snapshot, there is no versioning or time partitioning.
pub const SNAPSHOT_KEY: &str = "dynamodb_backup.parquet";

/// Content type declared on the uploaded snapshot object
pub const SNAPSHOT_CONTENT_TYPE: &str = "application/octet-stream";

/// Validated runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    /// Source DynamoDB table name
    pub table_name: String,

    /// Destination S3 bucket name
    pub bucket_name: String,
}

impl ExporterConfig {
    /// Load configuration from the process environment.
    ///
    /// Fails fast if either variable is missing or empty.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_values(
            env::var(TABLE_NAME_VAR).ok(),
            env::var(BUCKET_NAME_VAR).ok(),
        )
    }

    /// Build a configuration from already-resolved values.
    ///
    /// Split out from [`from_env`](Self::from_env) so validation can be
    /// tested without touching process environment state.
    pub fn from_values(
        table_name: Option<String>,
        bucket_name: Option<String>,
    ) -> ConfigResult<Self> {
        let table_name = require(TABLE_NAME_VAR, table_name)?;
        let bucket_name = require(BUCKET_NAME_VAR, bucket_name)?;
        Ok(Self {
            table_name,
            bucket_name,
        })
    }
}

fn require(name: &'static str, value: Option<String>) -> ConfigResult<String> {
    match value {
        None => Err(ConfigError::MissingVar { name }),
        Some(v) if v.trim().is_empty() => Err(ConfigError::EmptyVar { name }),
        Some(v) => Ok(v),
    }
}
