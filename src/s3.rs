//! S3 snapshot store
//!
//! Implements [`SnapshotStore`] with a single `PutObject` of the complete
//! buffer: full overwrite semantics on the destination key, content type
//! `application/octet-stream`, no retry, no multipart.

use crate::config::SNAPSHOT_CONTENT_TYPE;
use crate::error::{StoreError, StoreResult};
use crate::SnapshotStore;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use tracing::debug;

/// Snapshot store over one S3 bucket
pub struct S3SnapshotStore {
    client: Client,
    bucket: String,
}

impl S3SnapshotStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl SnapshotStore for S3SnapshotStore {
    async fn put_snapshot(&self, key: &str, body: Bytes) -> StoreResult<()> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(SNAPSHOT_CONTENT_TYPE)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StoreError::UploadFailed {
                bucket: self.bucket.clone(),
                key: key.to_string(),
                reason: format!("{}", DisplayErrorContext(e)),
            })?;

        debug!(
            bucket = %self.bucket,
            key,
            bytes = size,
            "Snapshot uploaded"
        );
        Ok(())
    }
}
