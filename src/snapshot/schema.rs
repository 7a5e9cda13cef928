//! Arrow schema inference for the snapshot
//!
//! The snapshot schema is derived from the row set itself: the field set is
//! the union of every record's keys, lexicographically ordered so the same
//! table always produces the same schema regardless of scan order. Every
//! field is Utf8 and nullable; records missing a field get a null cell.
//!
//! For a table whose items share one key set this degenerates to exactly
//! that key set.

use crate::record::{union_field_names, Record};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use std::sync::Arc;

/// Footer metadata keys embedded in every snapshot file
pub mod meta_keys {
    /// Name of the table the snapshot was scanned from
    pub const SOURCE_TABLE: &str = "source_table";
    /// RFC 3339 timestamp of the export
    pub const EXPORTED_AT: &str = "exported_at";
    /// Number of records in the snapshot
    pub const RECORD_COUNT: &str = "record_count";
}

/// Infer the snapshot schema from the row set.
///
/// Callers short-circuit the empty row set before encoding; an empty slice
/// here yields an empty schema.
pub fn infer_schema(records: &[Record]) -> SchemaRef {
    let fields: Vec<Field> = union_field_names(records)
        .into_iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}
