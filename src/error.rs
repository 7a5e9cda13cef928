//! Error types for the snapshot exporter
//!
//! One enum per pipeline stage, unified under [`ExportError`]:
//! - Configuration errors (missing environment)
//! - Source errors (DynamoDB scan)
//! - Snapshot errors (Arrow/Parquet encoding)
//! - Store errors (S3 upload)
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Errors should be actionable - include the table/bucket/key involved
//! - Preserve error chains for debugging
//!
//! There is no retry or recovery classification: every failure past
//! configuration is fatal for the invocation and the snapshot is
//! all-or-nothing.

use thiserror::Error;

/// Top-level error type for the snapshot exporter
#[derive(Error, Debug)]
pub enum ExportError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Table scan errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Columnar encoding errors
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Object upload errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Configuration and environment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("Missing required environment variable '{name}'")]
    MissingVar { name: &'static str },

    /// Required environment variable is set but empty
    #[error("Environment variable '{name}' must not be empty")]
    EmptyVar { name: &'static str },
}

/// Table scan errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Scan request failed
    #[error("Failed to scan table '{table}': {reason}")]
    ScanFailed { table: String, reason: String },
}

/// Columnar encoding errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet writer error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Invalid encoder configuration
    #[error("Invalid encoder configuration: {0}")]
    InvalidConfig(String),
}

/// Object upload errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Upload request failed
    #[error("Failed to upload 's3://{bucket}/{key}': {reason}")]
    UploadFailed {
        bucket: String,
        key: String,
        reason: String,
    },
}

/// Result type alias for ExportError
pub type Result<T> = std::result::Result<T, ExportError>;

/// Result type alias for ConfigError
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for SourceError
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for SnapshotError
pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

/// Result type alias for StoreError
pub type StoreResult<T> = std::result::Result<T, StoreError>;
