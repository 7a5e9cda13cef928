//! Integration tests for the snapshot exporter
//!
//! The pipeline is exercised end to end through in-memory implementations
//! of both seams; the Parquet buffers produced are decoded back with the
//! real Arrow reader.

use async_trait::async_trait;
use bytes::Bytes;
use dynamo_snapshot::config::{ExporterConfig, SNAPSHOT_KEY};
use dynamo_snapshot::error::{ExportError, SourceError, SourceResult, StoreResult};
use dynamo_snapshot::exporter::{SnapshotExporter, SnapshotOutcome};
use dynamo_snapshot::record::Record;
use dynamo_snapshot::{RecordSource, SnapshotStore};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Source that serves a fixed row set
struct MemorySource {
    records: Vec<Record>,
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn scan_all(&self) -> SourceResult<Vec<Record>> {
        Ok(self.records.clone())
    }
}

/// Source whose scan always fails
struct FailingSource;

#[async_trait]
impl RecordSource for FailingSource {
    async fn scan_all(&self) -> SourceResult<Vec<Record>> {
        Err(SourceError::ScanFailed {
            table: "events".into(),
            reason: "simulated outage".into(),
        })
    }
}

/// Store that keeps objects in a map, overwrite semantics included
#[derive(Default)]
struct MemoryStore {
    objects: Mutex<BTreeMap<String, Bytes>>,
    puts: AtomicUsize,
}

impl MemoryStore {
    fn object(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn put_snapshot(&self, key: &str, body: Bytes) -> StoreResult<()> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn record(fields: &[(&str, Option<&str>)]) -> Record {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.map(String::from)))
        .collect()
}

fn exporter(records: Vec<Record>, store: Arc<MemoryStore>) -> SnapshotExporter {
    SnapshotExporter::new(Arc::new(MemorySource { records }), store, "events")
}

/// Decode a snapshot buffer into (field names, rows as name → nullable text)
fn decode(bytes: Bytes) -> (Vec<String>, Vec<BTreeMap<String, Option<String>>>) {
    use arrow::array::StringArray;

    let reader = ParquetRecordBatchReaderBuilder::try_new(bytes)
        .unwrap()
        .build()
        .unwrap();

    let mut field_names = Vec::new();
    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch.unwrap();
        field_names = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col, field) in batch.schema().fields().iter().enumerate() {
                let values = batch
                    .column(col)
                    .as_any()
                    .downcast_ref::<StringArray>()
                    .unwrap();
                let cell = if values.is_null(row) {
                    None
                } else {
                    Some(values.value(row).to_string())
                };
                cells.insert(field.name().clone(), cell);
            }
            rows.push(cells);
        }
    }
    (field_names, rows)
}

#[tokio::test]
async fn test_empty_table_writes_nothing() {
    let store = Arc::new(MemoryStore::default());
    let outcome = exporter(vec![], store.clone()).run().await.unwrap();

    assert!(outcome.is_empty());
    assert_eq!(store.put_count(), 0);

    let resp = outcome.into_response();
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.body, "No data to backup");
}

#[tokio::test]
async fn test_uniform_rows_round_trip() {
    let records = vec![
        record(&[("id", Some("1")), ("name", Some("a"))]),
        record(&[("id", Some("2")), ("name", Some("b"))]),
    ];
    let store = Arc::new(MemoryStore::default());
    let outcome = exporter(records.clone(), store.clone()).run().await.unwrap();

    let stats = match outcome {
        SnapshotOutcome::Written(stats) => stats,
        other => panic!("expected written outcome, got {:?}", other),
    };
    assert_eq!(stats.records, 2);
    assert_eq!(stats.fields, 2);

    let (fields, mut rows) = decode(store.object(SNAPSHOT_KEY).unwrap());
    assert_eq!(fields, vec!["id", "name"]);

    // Row order is not part of the contract
    rows.sort_by(|a, b| a.get("id").cmp(&b.get("id")));
    assert_eq!(rows, records);
}

#[tokio::test]
async fn test_snapshot_key_is_fixed() {
    let store = Arc::new(MemoryStore::default());
    exporter(vec![record(&[("id", Some("1"))])], store.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(store.object_count(), 1);
    assert!(store.object("dynamodb_backup.parquet").is_some());
}

#[tokio::test]
async fn test_second_invocation_overwrites() {
    let store = Arc::new(MemoryStore::default());

    exporter(
        vec![
            record(&[("id", Some("1"))]),
            record(&[("id", Some("2"))]),
        ],
        store.clone(),
    )
    .run()
    .await
    .unwrap();

    let (_, rows) = decode(store.object(SNAPSHOT_KEY).unwrap());
    assert_eq!(rows.len(), 2);

    exporter(vec![record(&[("id", Some("9"))])], store.clone())
        .run()
        .await
        .unwrap();

    // Still one object, holding only the second invocation's rows
    assert_eq!(store.object_count(), 1);
    let (_, rows) = decode(store.object(SNAPSHOT_KEY).unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("id"), Some(&Some("9".to_string())));
}

#[tokio::test]
async fn test_heterogeneous_rows_use_union_schema() {
    let records = vec![
        record(&[("id", Some("1"))]),
        record(&[("id", Some("2")), ("extra", Some("x"))]),
    ];
    let store = Arc::new(MemoryStore::default());
    exporter(records, store.clone()).run().await.unwrap();

    let (fields, mut rows) = decode(store.object(SNAPSHOT_KEY).unwrap());
    assert_eq!(fields, vec!["extra", "id"]);

    rows.sort_by(|a, b| a.get("id").cmp(&b.get("id")));
    assert_eq!(rows[0].get("extra"), Some(&None));
    assert_eq!(rows[1].get("extra"), Some(&Some("x".to_string())));
}

#[tokio::test]
async fn test_null_cells_survive_round_trip() {
    let records = vec![record(&[("id", Some("1")), ("deleted", None)])];
    let store = Arc::new(MemoryStore::default());
    exporter(records, store.clone()).run().await.unwrap();

    let (_, rows) = decode(store.object(SNAPSHOT_KEY).unwrap());
    assert_eq!(rows[0].get("deleted"), Some(&None));
}

#[tokio::test]
async fn test_scan_failure_uploads_nothing() {
    let store = Arc::new(MemoryStore::default());
    let exporter = SnapshotExporter::new(Arc::new(FailingSource), store.clone(), "events");

    let err = exporter.run().await.unwrap_err();
    assert!(matches!(err, ExportError::Source(_)));
    assert_eq!(store.put_count(), 0);
}

#[test]
fn test_missing_configuration_fails_fast() {
    // Validation happens before any client is built or any read attempted
    assert!(ExporterConfig::from_values(None, Some("backups".into())).is_err());
    assert!(ExporterConfig::from_values(Some("events".into()), None).is_err());
    assert!(ExporterConfig::from_values(None, None).is_err());
}
