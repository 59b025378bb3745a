//! Structured logging setup

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global JSON subscriber
///
/// `RUST_LOG` takes precedence; otherwise `level` applies to the seeder crates.
pub fn init(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(level)?)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .context("failed to install tracing subscriber")
}

fn default_directives(level: &str) -> anyhow::Result<String> {
    let level = level.trim().to_ascii_lowercase();
    level
        .parse::<LevelFilter>()
        .with_context(|| format!("invalid log level {level:?}"))?;

    Ok(format!(
        "gocd_seeder={level},seeder_client={level},seeder_core={level},tower_http=warn"
    ))
}
