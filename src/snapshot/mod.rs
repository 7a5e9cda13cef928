//! Columnar snapshot encoding
//!
//! Turns one invocation's row set into a self-describing Parquet buffer.
//!
//! # Module Structure
//!
//! - `schema`: Arrow schema inference (union of record keys, all Utf8)
//! - `encode`: row set → RecordBatch chunks → in-memory Parquet bytes

pub mod encode;
pub mod schema;

pub use encode::{encode_snapshot, EncodeConfig, SnapshotMeta};
pub use schema::{infer_schema, meta_keys};
