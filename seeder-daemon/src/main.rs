//! GoCD Seeder
//!
//! Keeps GoCD config repo registrations in step with the GitHub repositories
//! tagged with a marker topic.
//!
//! Architecture:
//! - Configuration: CLI flags with environment fallbacks, secrets from env or files
//! - Repositories: capability traits over GitHub and GoCD
//! - Services: the reconciliation engine
//! - Scheduler: fixed-interval cycles and graceful shutdown
//! - Stats: `/debug/vars` and `/health` on a side port

mod cli;
mod config;
mod logging;
mod repository;
mod scheduler;
mod secrets;
mod service;
mod shutdown;
mod stats;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::repository::{GithubRepositoryProvider, PipelineRegistry, RepositoryProvider};
use crate::scheduler::{Scheduler, wait_for_stop};
use crate::secrets::EnvSecretSource;
use crate::service::Reconciler;
use crate::stats::Stats;
use seeder_client::{GithubClient, GocdClient};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Version) = cli.command {
        cli::print_version();
        return Ok(());
    }

    logging::init(&cli.run.log_level)?;

    let config = load_config(cli.run)?;
    info!(
        org = config.github_org.as_deref().unwrap_or("<token scope>"),
        topic = %config.github_topic,
        gocd_url = %config.gocd_url,
        prefix = %config.prefix,
        "Starting GoCD seeder"
    );

    run(config).await
}

/// Loads and validates configuration from CLI arguments and the environment
fn load_config(args: cli::RunArgs) -> Result<Config> {
    let config = Config::from_args(args, &EnvSecretSource).context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

async fn run(config: Config) -> Result<()> {
    let http = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .context("Failed to build HTTP client")?;

    let github = GithubClient::new(config.github_api_key.clone())?
        .with_api_url(config.github_api_url.clone())
        .with_client(http.clone());
    let provider: Arc<dyn RepositoryProvider> = Arc::new(GithubRepositoryProvider::new(
        github,
        config.github_org.clone(),
        config.github_topic.clone(),
    ));

    let gocd = GocdClient::with_client(config.gocd_url.clone(), http)
        .with_basic_auth(config.gocd_auth.clone());
    if !gocd.has_credentials() {
        info!("No GoCD credentials configured, using anonymous access");
    }
    let registry: Arc<dyn PipelineRegistry> = Arc::new(gocd);

    let reconciler = Reconciler::new(provider, registry, config.prefix.clone());
    info!(prefix = %reconciler.prefix(), "Reconciler initialized");

    let cancel = CancellationToken::new();

    let stats_addr = config.stats_addr;
    let stats_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = stats::serve(stats_addr, Stats::new(), stats_cancel).await {
            error!(addr = %stats_addr, error = %e, "stats endpoint failed");
        }
    });

    let scheduler = Scheduler::new(reconciler, config.poll_interval);
    let state = scheduler.subscribe();
    let handle = tokio::spawn(scheduler.run(cancel.clone()));

    let signal = shutdown::wait_for_signal().await?;
    info!(signal, "Received signal, shutting down");
    cancel.cancel();

    if wait_for_stop(state, config.shutdown_grace_period).await {
        info!("good bye");
    } else {
        warn!(
            grace_period = ?config.shutdown_grace_period,
            "reconciliation cycle still running after grace period, exiting anyway"
        );
        handle.abort();
    }

    Ok(())
}
