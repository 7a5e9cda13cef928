//! Snapshot export orchestration
//!
//! Drives one invocation end to end: scan the table, short-circuit an empty
//! row set, infer the schema, encode the Parquet buffer, upload it. Both
//! ends of the pipeline are injected, so the exporter itself never touches
//! a client library.

use crate::config::SNAPSHOT_KEY;
use crate::error::Result;
use crate::snapshot::{encode_snapshot, infer_schema, EncodeConfig, SnapshotMeta};
use crate::{RecordSource, SnapshotStore};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// One-shot table → snapshot exporter
pub struct SnapshotExporter {
    source: Arc<dyn RecordSource>,
    store: Arc<dyn SnapshotStore>,
    table_name: String,
    encode: EncodeConfig,
}

impl SnapshotExporter {
    pub fn new(
        source: Arc<dyn RecordSource>,
        store: Arc<dyn SnapshotStore>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            store,
            table_name: table_name.into(),
            encode: EncodeConfig::default(),
        }
    }

    /// Override the encoder configuration
    pub fn with_encode_config(mut self, encode: EncodeConfig) -> Self {
        self.encode = encode;
        self
    }

    /// Run one full export.
    ///
    /// All-or-nothing: any scan, encode, or upload failure propagates and
    /// nothing is written. An empty table is a successful no-op.
    pub async fn run(&self) -> Result<SnapshotOutcome> {
        let started = Instant::now();

        let records = self.source.scan_all().await?;
        if records.is_empty() {
            info!(table = %self.table_name, "No data found in the table");
            return Ok(SnapshotOutcome::Empty);
        }

        let schema = infer_schema(&records);
        let meta = SnapshotMeta::new(self.table_name.clone());
        let buffer = encode_snapshot(&records, &schema, &meta, &self.encode)?;

        let stats = SnapshotStats {
            records: records.len(),
            fields: schema.fields().len(),
            bytes: buffer.len(),
            elapsed: started.elapsed(),
        };

        self.store.put_snapshot(SNAPSHOT_KEY, buffer).await?;

        info!(
            table = %self.table_name,
            records = stats.records,
            fields = stats.fields,
            bytes = stats.bytes,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "Snapshot written to {}",
            SNAPSHOT_KEY
        );
        Ok(SnapshotOutcome::Written(stats))
    }
}

/// Outcome of one export invocation
#[derive(Debug, Clone)]
pub enum SnapshotOutcome {
    /// The source table was empty; nothing was written
    Empty,

    /// A snapshot was encoded and uploaded
    Written(SnapshotStats),
}

impl SnapshotOutcome {
    /// Returns true if the table had no data
    pub fn is_empty(&self) -> bool {
        matches!(self, SnapshotOutcome::Empty)
    }

    /// Map the outcome to the invocation response.
    ///
    /// Both cases report status 200; failures never reach this point - they
    /// propagate to the host runtime instead.
    pub fn into_response(self) -> SnapshotResponse {
        match self {
            SnapshotOutcome::Empty => SnapshotResponse {
                status_code: 200,
                body: "No data to backup".to_string(),
            },
            SnapshotOutcome::Written(_) => SnapshotResponse {
                status_code: 200,
                body: "Backup saved in Parquet format".to_string(),
            },
        }
    }
}

/// Statistics from a written snapshot
#[derive(Debug, Clone)]
pub struct SnapshotStats {
    /// Records exported
    pub records: usize,
    /// Columns in the inferred schema
    pub fields: usize,
    /// Size of the encoded buffer
    pub bytes: usize,
    /// Wall time for the whole invocation
    pub elapsed: Duration,
}

/// Invocation response shape expected by the event host
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_outcome_response() {
        let resp = SnapshotOutcome::Empty.into_response();
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.body, "No data to backup");
    }

    #[test]
    fn test_written_outcome_response() {
        let stats = SnapshotStats {
            records: 2,
            fields: 2,
            bytes: 1024,
            elapsed: Duration::from_millis(5),
        };
        let resp = SnapshotOutcome::Written(stats).into_response();
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.body, "Backup saved in Parquet format");
    }

    #[test]
    fn test_response_serializes_status_code_key() {
        let resp = SnapshotOutcome::Empty.into_response();
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["body"], "No data to backup");
    }
}
