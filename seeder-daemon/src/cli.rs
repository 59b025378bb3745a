//! Command-line interface
//!
//! Every setting is a flag with an environment fallback. Running the seeder is
//! the default action; `version` and `help` are the only subcommands.

use clap::{Args, Parser, Subcommand};
use colored::*;
use seeder_client::github::DEFAULT_API_URL;
use seeder_core::domain::repository::DEFAULT_TOPIC;

pub const BIN_NAME: &str = "gocd-seeder";

#[derive(Debug, Parser)]
#[command(name = BIN_NAME)]
#[command(about = "Registers GitHub repositories tagged with a topic as GoCD config repos", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print version information
    Version,
}

/// Settings for the reconciliation daemon
///
/// Credentials are not flags; they are read through the secret source.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// GitHub organization to scan (all repositories visible to the token if unset)
    #[arg(long, env = "GITHUB_ORG")]
    pub github_org: Option<String>,

    /// Topic marking a repository for registration
    #[arg(long, env = "GITHUB_TOPIC", default_value = DEFAULT_TOPIC)]
    pub github_topic: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// GoCD server base URL
    #[arg(long, env = "GOCD_URL", default_value = "http://localhost:8081")]
    pub gocd_url: String,

    /// Prefix for config repo IDs (defaults to the organization)
    #[arg(long, env = "GOCD_PREFIX")]
    pub gocd_prefix: Option<String>,

    /// Address for the stats endpoint (all interfaces if unset)
    #[arg(long = "stats-ip", env = "HTTP_STATS_IP")]
    pub stats_ip: Option<String>,

    /// Port for the stats endpoint
    #[arg(long = "stats-port", env = "HTTP_STATS_PORT", default_value_t = 9090)]
    pub stats_port: u16,

    /// Seconds between reconciliation cycles
    #[arg(long, env = "POLL_INTERVAL", default_value_t = 55)]
    pub poll_interval: u64,

    /// Seconds to wait for an in-flight cycle on shutdown
    #[arg(long, env = "SHUTDOWN_GRACE_PERIOD", default_value_t = 10)]
    pub shutdown_grace_period: u64,

    /// Timeout in seconds for each outbound HTTP request
    #[arg(long, env = "HTTP_TIMEOUT", default_value_t = 10)]
    pub http_timeout: u64,

    /// Log verbosity (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Prints the binary name, version, revision and build target
pub fn print_version() {
    println!("{} {}", BIN_NAME.bold(), env!("CARGO_PKG_VERSION").green());
    println!(
        "  {}  {}",
        "revision:".dimmed(),
        option_env!("SEEDER_GIT_SHA").unwrap_or("unknown")
    );
    println!(
        "  {}    {}/{}",
        "target:".dimmed(),
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["gocd-seeder", "--github-org", "acme"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.github_org.as_deref(), Some("acme"));
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "gocd-seeder",
            "--github-topic",
            "deploy-me",
            "--gocd-url",
            "https://gocd.example.com",
            "--stats-port",
            "9191",
            "--poll-interval",
            "30",
        ])
        .unwrap();

        assert_eq!(cli.run.github_topic, "deploy-me");
        assert_eq!(cli.run.gocd_url, "https://gocd.example.com");
        assert_eq!(cli.run.stats_port, 9191);
        assert_eq!(cli.run.poll_interval, 30);
    }

    #[test]
    fn test_version_subcommand() {
        let cli = Cli::try_parse_from(["gocd-seeder", "version"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Version)));
    }

    #[test]
    fn test_rejects_non_numeric_port() {
        assert!(Cli::try_parse_from(["gocd-seeder", "--stats-port", "http"]).is_err());
    }
}
