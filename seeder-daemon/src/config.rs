//! Seeder configuration
//!
//! Assembled once at startup from the parsed command line and the secret
//! source, then validated before any client is built.

use anyhow::Context;
use seeder_client::BasicAuth;
use seeder_core::domain::naming::RegistrationPrefix;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::cli::RunArgs;
use crate::secrets::{self, SecretSource};

/// Seeder configuration
#[derive(Clone)]
pub struct Config {
    /// GitHub access token
    pub github_api_key: String,

    /// GitHub REST API base URL
    pub github_api_url: String,

    /// Organization to scan; `None` lists everything visible to the token
    pub github_org: Option<String>,

    /// Topic marking a repository for registration
    pub github_topic: String,

    /// GoCD server base URL (e.g., "http://localhost:8081")
    pub gocd_url: String,

    /// GoCD basic-auth credentials, only when both parts are set
    pub gocd_auth: Option<BasicAuth>,

    /// Prefix applied to every registration ID
    pub prefix: RegistrationPrefix,

    /// Bind address of the stats endpoint
    pub stats_addr: SocketAddr,

    pub poll_interval: Duration,
    pub shutdown_grace_period: Duration,
    pub http_timeout: Duration,
}

impl Config {
    /// Builds the configuration from CLI arguments and secrets
    ///
    /// An unset API key is left empty here and rejected by [`Config::validate`].
    pub fn from_args(args: RunArgs, secrets: &dyn SecretSource) -> anyhow::Result<Self> {
        let github_api_key =
            secrets::read_optional(secrets, secrets::GITHUB_API_KEY)?.unwrap_or_default();
        let gocd_user = secrets::read_optional(secrets, secrets::GOCD_USER)?;
        let gocd_password = secrets::read_optional(secrets, secrets::GOCD_PASSWORD)?;

        let github_org = args.github_org.filter(|org| !org.is_empty());
        let prefix = match args.gocd_prefix.filter(|p| !p.is_empty()) {
            Some(prefix) => RegistrationPrefix::new(prefix),
            None => RegistrationPrefix::from(github_org.clone()),
        };

        let stats_ip = match args.stats_ip.as_deref().map(str::trim) {
            None | Some("") => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            Some(ip) => ip
                .parse()
                .with_context(|| format!("invalid HTTP_STATS_IP {ip:?}"))?,
        };

        Ok(Self {
            github_api_key,
            github_api_url: args.github_api_url,
            github_org,
            github_topic: args.github_topic,
            gocd_url: args.gocd_url,
            gocd_auth: BasicAuth::from_parts(gocd_user, gocd_password),
            prefix,
            stats_addr: SocketAddr::new(stats_ip, args.stats_port),
            poll_interval: Duration::from_secs(args.poll_interval),
            shutdown_grace_period: Duration::from_secs(args.shutdown_grace_period),
            http_timeout: Duration::from_secs(args.http_timeout),
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.github_api_key.trim().is_empty() {
            anyhow::bail!("missing github api key (set GITHUB_API_KEY or GITHUB_API_KEY_FILE)");
        }

        for (name, url) in [
            ("github_api_url", &self.github_api_url),
            ("gocd_url", &self.gocd_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("{name} must start with http:// or https://");
            }
        }

        if self.github_topic.is_empty() {
            anyhow::bail!("github_topic cannot be empty");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.http_timeout.is_zero() {
            anyhow::bail!("http_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("github_api_key", &"<redacted>")
            .field("github_api_url", &self.github_api_url)
            .field("github_org", &self.github_org)
            .field("github_topic", &self.github_topic)
            .field("gocd_url", &self.gocd_url)
            .field("gocd_auth", &self.gocd_auth)
            .field("prefix", &self.prefix)
            .field("stats_addr", &self.stats_addr)
            .field("poll_interval", &self.poll_interval)
            .field("shutdown_grace_period", &self.shutdown_grace_period)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}
