//! In-memory record model
//!
//! A [`Record`] is one table item flattened to field name → nullable string.
//! Records are ephemeral: they exist only between the scan and the encode
//! step of a single invocation.
//!
//! The string rendering policy for DynamoDB attributes lives with the scan
//! code in [`crate::dynamo`]; this module only defines the shape the encoder
//! consumes.

use std::collections::{BTreeMap, BTreeSet};

/// A single table item: field name → value, `None` for an explicit null.
///
/// `BTreeMap` keeps field iteration deterministic regardless of the order
/// the scan returned attributes in.
pub type Record = BTreeMap<String, Option<String>>;

/// Collect the union of field names across all records, sorted.
///
/// For records with uniform keys this is exactly the key set of the first
/// record; heterogeneous records are normalized to the union.
pub fn union_field_names(records: &[Record]) -> Vec<String> {
    let names: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .collect();
    names.into_iter().map(String::from).collect()
}
