//! DynamoDB table reader
//!
//! Implements [`RecordSource`] with a full unfiltered Scan of one table,
//! following `LastEvaluatedKey` until the table is exhausted so snapshots
//! stay complete past the 1 MB per-page scan limit.
//!
//! Every attribute is rendered to a string cell:
//! - `S` and `N` keep their wire text
//! - `BOOL` renders as `true`/`false`
//! - `NULL` becomes a null cell
//! - `B` is base64-encoded
//! - sets, lists, and maps render as JSON

use crate::error::{SourceError, SourceResult};
use crate::record::Record;
use crate::RecordSource;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::collections::HashMap;
use tracing::debug;

/// Full-scan reader over one DynamoDB table
pub struct DynamoTableSource {
    client: Client,
    table: String,
}

impl DynamoTableSource {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }
}

#[async_trait]
impl RecordSource for DynamoTableSource {
    async fn scan_all(&self) -> SourceResult<Vec<Record>> {
        let mut records = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        let mut pages: u32 = 0;

        loop {
            let resp = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| SourceError::ScanFailed {
                    table: self.table.clone(),
                    reason: format!("{}", DisplayErrorContext(e)),
                })?;

            pages += 1;
            if let Some(items) = resp.items {
                records.extend(items.into_iter().map(record_from_item));
            }

            start_key = resp.last_evaluated_key;
            if start_key.is_none() {
                break;
            }
        }

        debug!(
            table = %self.table,
            pages,
            records = records.len(),
            "Table scan complete"
        );
        Ok(records)
    }
}

/// Flatten one scan item into a [`Record`]
pub fn record_from_item(item: HashMap<String, AttributeValue>) -> Record {
    item.into_iter()
        .map(|(name, value)| {
            let text = attribute_to_text(&value);
            (name, text)
        })
        .collect()
}

/// Render a single attribute to its string cell, `None` for NULL
pub fn attribute_to_text(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::S(s) => Some(s.clone()),
        AttributeValue::N(n) => Some(n.clone()),
        AttributeValue::Bool(b) => Some(b.to_string()),
        AttributeValue::Null(_) => None,
        AttributeValue::B(blob) => Some(BASE64.encode(blob.as_ref())),
        other => Some(attribute_to_json(other).to_string()),
    }
}

/// JSON rendering for composite attributes (and the scalars they contain)
fn attribute_to_json(value: &AttributeValue) -> serde_json::Value {
    use serde_json::Value;

    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => serde_json::from_str::<serde_json::Number>(n)
            .map(Value::Number)
            .unwrap_or_else(|_| Value::String(n.clone())),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::B(blob) => Value::String(BASE64.encode(blob.as_ref())),
        AttributeValue::Ss(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(items) => Value::Array(
            items
                .iter()
                .map(|n| {
                    serde_json::from_str::<serde_json::Number>(n)
                        .map(Value::Number)
                        .unwrap_or_else(|_| Value::String(n.clone()))
                })
                .collect(),
        ),
        AttributeValue::Bs(items) => Value::Array(
            items
                .iter()
                .map(|blob| Value::String(BASE64.encode(blob.as_ref())))
                .collect(),
        ),
        AttributeValue::L(items) => Value::Array(items.iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), attribute_to_json(v)))
                .collect(),
        ),
        _ => Value::Null,
    }
}
