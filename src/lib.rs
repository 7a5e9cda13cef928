//! dynamo-snapshot - DynamoDB to Parquet Snapshot Exporter
//!
//! Copies the full contents of a DynamoDB table into S3 as a single
//! columnar snapshot file. One synchronous pass per invocation, no
//! incremental state, no partitioning: each run overwrites the previous
//! snapshot object.
//!
//! # Pipeline
//!
//! ```text
//! ┌────────────────┐   Scan (all pages)   ┌──────────────────────────┐
//! │ DynamoDB table │ ───────────────────► │ Row set (in memory)      │
//! └────────────────┘                      │ field name → string|null │
//!                                         └────────────┬─────────────┘
//!                                                      │ infer union schema
//!                                                      ▼
//!                                         ┌──────────────────────────┐
//!                                         │ Parquet buffer (Vec<u8>) │
//!                                         │ ZSTD, column statistics  │
//!                                         └────────────┬─────────────┘
//!                                                      │ PutObject
//!                                                      ▼
//!                                         ┌──────────────────────────┐
//!                                         │ s3://bucket/             │
//!                                         │   dynamodb_backup.parquet│
//!                                         └──────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```bash
//! # One-shot local run against real AWS credentials
//! TABLE_NAME=events BUCKET_NAME=my-backups snapshot-once
//!
//! # Inspect the result
//! aws s3 cp s3://my-backups/dynamodb_backup.parquet - | parquet-tools cat -
//! ```
//!
//! The scan and upload sides of the pipeline are traits so the exporter can
//! be driven by constructed dependencies rather than ambient clients, and
//! tested against in-memory implementations.

pub mod config;
pub mod dynamo;
pub mod error;
pub mod exporter;
pub mod record;
pub mod s3;
pub mod snapshot;

use async_trait::async_trait;
use bytes::Bytes;

pub use config::{ExporterConfig, SNAPSHOT_CONTENT_TYPE, SNAPSHOT_KEY};
pub use error::{ExportError, Result};
pub use exporter::{SnapshotExporter, SnapshotOutcome, SnapshotResponse, SnapshotStats};
pub use record::Record;

/// Source side of the pipeline: produces the full row set for one invocation.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every row from the source table.
    ///
    /// Implementations must follow scan continuation to exhaustion; a
    /// partial row set is never returned. Any read failure is fatal.
    async fn scan_all(&self) -> error::SourceResult<Vec<Record>>;
}

/// Sink side of the pipeline: stores one complete snapshot buffer.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Upload the buffer under `key`, overwriting any existing object.
    async fn put_snapshot(&self, key: &str, body: Bytes) -> error::StoreResult<()>;
}
