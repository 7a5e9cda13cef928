//! dynamo-snapshot - Lambda entrypoint
//!
//! Configuration is validated and clients are constructed once at process
//! startup; warm invocations reuse them by reference. The event payload and
//! context are accepted but unused - every invocation exports the whole
//! configured table.

use aws_config::BehaviorVersion;
use dynamo_snapshot::config::ExporterConfig;
use dynamo_snapshot::dynamo::DynamoTableSource;
use dynamo_snapshot::exporter::{SnapshotExporter, SnapshotResponse};
use dynamo_snapshot::s3::S3SnapshotStore;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    setup_logging();

    // Fail fast on missing environment before serving any invocation
    let config = ExporterConfig::from_env()?;

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let source = Arc::new(DynamoTableSource::new(
        aws_sdk_dynamodb::Client::new(&aws),
        config.table_name.clone(),
    ));
    let store = Arc::new(S3SnapshotStore::new(
        aws_sdk_s3::Client::new(&aws),
        config.bucket_name.clone(),
    ));
    let exporter = Arc::new(SnapshotExporter::new(
        source,
        store,
        config.table_name.clone(),
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let exporter = Arc::clone(&exporter);
        async move { handle(exporter, event).await }
    }))
    .await
}

/// Handle one invocation.
///
/// Errors are returned to the runtime unmapped: the host's own error
/// reporting takes over, there is no failure status code in the response
/// contract.
async fn handle(
    exporter: Arc<SnapshotExporter>,
    _event: LambdaEvent<Value>,
) -> Result<SnapshotResponse, Error> {
    let outcome = exporter.run().await?;
    Ok(outcome.into_response())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        // The log host stamps its own timestamps
        .without_time()
        .init();
}
