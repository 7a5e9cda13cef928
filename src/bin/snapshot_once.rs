//! One-shot snapshot export from the command line
//!
//! Runs the same pipeline as the Lambda entrypoint exactly once, against
//! ambient AWS credentials. Useful for manual exports and for smoke-testing
//! a deployment's configuration.

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use clap::Parser;
use dynamo_snapshot::config::{ExporterConfig, SNAPSHOT_KEY};
use dynamo_snapshot::dynamo::DynamoTableSource;
use dynamo_snapshot::exporter::{SnapshotExporter, SnapshotOutcome};
use dynamo_snapshot::s3::S3SnapshotStore;
use dynamo_snapshot::snapshot::EncodeConfig;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Export one DynamoDB table to S3 as a Parquet snapshot
#[derive(Parser, Debug)]
#[command(
    name = "snapshot-once",
    version,
    about = "Export one DynamoDB table to S3 as a Parquet snapshot",
    after_help = "EXAMPLES:\n    \
        snapshot-once --table events --bucket my-backups\n    \
        TABLE_NAME=events BUCKET_NAME=my-backups snapshot-once\n    \
        snapshot-once --table events --bucket my-backups --compression-level 9"
)]
struct Args {
    /// Source DynamoDB table
    #[arg(long, env = "TABLE_NAME", value_name = "TABLE")]
    table: String,

    /// Destination S3 bucket
    #[arg(long, env = "BUCKET_NAME", value_name = "BUCKET")]
    bucket: String,

    /// Rows per Parquet row group
    #[arg(long, default_value = "100000", value_name = "NUM")]
    row_group_size: usize,

    /// ZSTD compression level (1-22)
    #[arg(long, default_value = "3", value_name = "LEVEL")]
    compression_level: i32,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = ExporterConfig::from_values(Some(args.table), Some(args.bucket))
        .context("Invalid configuration")?;

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let source = Arc::new(DynamoTableSource::new(
        aws_sdk_dynamodb::Client::new(&aws),
        config.table_name.clone(),
    ));
    let store = Arc::new(S3SnapshotStore::new(
        aws_sdk_s3::Client::new(&aws),
        config.bucket_name.clone(),
    ));

    let exporter = SnapshotExporter::new(source, store, config.table_name.clone())
        .with_encode_config(EncodeConfig {
            row_group_size: args.row_group_size,
            compression_level: args.compression_level,
        });

    let outcome = exporter.run().await.context("Export failed")?;
    match outcome {
        SnapshotOutcome::Empty => {
            println!("Table '{}' is empty - nothing to back up", config.table_name);
        }
        SnapshotOutcome::Written(stats) => {
            println!(
                "Wrote s3://{}/{}: {} records, {} columns, {} bytes in {:.2?}",
                config.bucket_name,
                SNAPSHOT_KEY,
                stats.records,
                stats.fields,
                stats.bytes,
                stats.elapsed
            );
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}
