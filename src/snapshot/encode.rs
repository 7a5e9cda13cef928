//! Row set to Parquet conversion
//!
//! Builds the whole snapshot in memory: one Arrow `StringBuilder` per
//! column, flushed to the writer in row-group-sized batches, ZSTD
//! compression with chunk-level column statistics, and footer metadata
//! identifying the source table and export time.

use crate::error::{SnapshotError, SnapshotResult};
use crate::record::Record;
use crate::snapshot::schema::meta_keys;
use arrow::array::{ArrayRef, StringBuilder};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::metadata::KeyValue;
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use std::sync::Arc;

/// Configuration for the snapshot encoder
#[derive(Debug, Clone)]
pub struct EncodeConfig {
    /// Number of rows per row group
    pub row_group_size: usize,
    /// ZSTD compression level (1-22)
    pub compression_level: i32,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            row_group_size: 100_000,
            compression_level: 3,
        }
    }
}

/// Provenance stamped into the snapshot footer
#[derive(Debug, Clone)]
pub struct SnapshotMeta {
    /// Table the row set was scanned from
    pub source_table: String,
    /// When the export ran
    pub exported_at: DateTime<Utc>,
}

impl SnapshotMeta {
    pub fn new(source_table: impl Into<String>) -> Self {
        Self {
            source_table: source_table.into(),
            exported_at: Utc::now(),
        }
    }
}

/// Encode the full row set into one self-describing Parquet buffer.
///
/// Row values are looked up by schema field name; a record missing a field
/// (or carrying an explicit null) contributes a null cell. Any Arrow or
/// Parquet failure aborts the snapshot - no partial buffer is returned.
pub fn encode_snapshot(
    records: &[Record],
    schema: &SchemaRef,
    meta: &SnapshotMeta,
    config: &EncodeConfig,
) -> SnapshotResult<Bytes> {
    if config.row_group_size == 0 {
        return Err(SnapshotError::InvalidConfig(
            "row_group_size must be at least 1".into(),
        ));
    }

    let props = writer_properties(meta, records.len(), config)?;

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, schema.clone(), Some(props))?;
    for chunk in records.chunks(config.row_group_size) {
        let batch = build_batch(schema, chunk)?;
        writer.write(&batch)?;
    }
    writer.close()?;

    Ok(Bytes::from(buf))
}

/// Build Parquet writer properties: ZSTD, column statistics, footer metadata.
fn writer_properties(
    meta: &SnapshotMeta,
    record_count: usize,
    config: &EncodeConfig,
) -> SnapshotResult<WriterProperties> {
    let zstd_level = ZstdLevel::try_new(config.compression_level)?;

    Ok(WriterProperties::builder()
        .set_compression(Compression::ZSTD(zstd_level))
        .set_statistics_enabled(EnabledStatistics::Chunk)
        .set_max_row_group_size(config.row_group_size)
        .set_key_value_metadata(Some(vec![
            KeyValue::new(
                meta_keys::SOURCE_TABLE.to_string(),
                meta.source_table.clone(),
            ),
            KeyValue::new(
                meta_keys::EXPORTED_AT.to_string(),
                meta.exported_at.to_rfc3339(),
            ),
            KeyValue::new(
                meta_keys::RECORD_COUNT.to_string(),
                record_count.to_string(),
            ),
        ]))
        .build())
}

/// Convert a slice of records into one RecordBatch against the schema.
fn build_batch(schema: &SchemaRef, records: &[Record]) -> SnapshotResult<RecordBatch> {
    let mut builders: Vec<StringBuilder> = schema
        .fields()
        .iter()
        .map(|_| StringBuilder::new())
        .collect();

    for record in records {
        for (builder, field) in builders.iter_mut().zip(schema.fields().iter()) {
            match record.get(field.name()).and_then(|v| v.as_deref()) {
                Some(value) => builder.append_value(value),
                None => builder.append_null(),
            }
        }
    }

    let columns: Vec<ArrayRef> = builders
        .into_iter()
        .map(|mut b| Arc::new(b.finish()) as ArrayRef)
        .collect();

    RecordBatch::try_new(schema.clone(), columns).map_err(SnapshotError::Arrow)
}
