mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use dataload_athena::AthenaClient;
use dataload_cli::{configured_query, resolve_query, Orchestrator, RunConfig};
use dataload_core::load_dotenv;
use dataload_notify::HttpIngestNotifier;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    // Logs go to stderr; stdout carries only the job report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let profile = args.profile.as_deref().unwrap_or_default().to_uppercase();

    let query = resolve_query(args.query.as_deref(), configured_query(&profile).as_deref())?;

    let mut config =
        RunConfig::from_env_profiled(&profile).context("failed to load configuration")?;
    if let Some(timeout) = args.timeout_secs {
        config.athena.timeout_seconds = timeout;
    }

    let notifier =
        HttpIngestNotifier::new(&config.ingest).context("failed to create ingestion notifier")?;
    let poll = config.athena.poll_policy();
    let ctas = config.athena.ctas_options();
    let athena = AthenaClient::new(config.athena).await;

    let orchestrator = Orchestrator::new(Arc::new(athena), Arc::new(notifier))
        .with_poll_policy(poll)
        .with_ctas_options(ctas);

    let report = orchestrator.run(&query).await.context("data load failed")?;

    if report.job_id().is_none() {
        warn!(body = %report.receipt.body_text(), "ingestion response carried no jobId");
    }
    info!(
        table = %report.table,
        query_id = %report.query_id,
        location = %report.location,
        "data load requested"
    );
    println!("{}", report.summary());

    Ok(())
}
