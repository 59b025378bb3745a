//! GitHub repository listing client
//!
//! Lists the repositories visible to an access token, either scoped to one
//! organization or across everything the token can see, and follows `Link`
//! pagination until the listing is complete.

use reqwest::header::{ACCEPT, HeaderMap, LINK, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use seeder_core::domain::repository::{RepositoryDescriptor, filter_by_topic};
use seeder_core::dto::github::GithubRepository;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};

/// Public GitHub API
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";
const PER_PAGE: u32 = 100;

/// HTTP client for the GitHub repositories API
#[derive(Clone)]
pub struct GithubClient {
    api_url: String,
    token: String,
    client: Client,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl GithubClient {
    /// Create a client for the public GitHub API
    ///
    /// # Errors
    /// [`ClientError::Config`] when `token` is empty; GitHub cannot be
    /// queried without credentials.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ClientError::Config("missing github api key".to_string()));
        }

        Ok(Self {
            api_url: DEFAULT_API_URL.to_string(),
            token,
            client: Client::new(),
        })
    }

    /// Point the client at another API root (GitHub Enterprise, test servers)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies, TLS)
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// List repositories carrying `topic`
    ///
    /// The full listing is fetched before filtering, so the result is
    /// complete for the scope or the call fails as a whole.
    pub async fn tagged_repositories(
        &self,
        org: Option<&str>,
        topic: &str,
    ) -> Result<Vec<RepositoryDescriptor>> {
        let repos = self.list_repositories(org).await?;
        let total = repos.len();
        let tagged = filter_by_topic(repos, topic);

        debug!(total, tagged = tagged.len(), topic, "filtered github repositories");
        Ok(tagged)
    }

    /// List every repository in scope, following all pages
    pub async fn list_repositories(&self, org: Option<&str>) -> Result<Vec<RepositoryDescriptor>> {
        let (context, first_page) = match org.filter(|o| !o.is_empty()) {
            Some(org) => (
                format!("listing repositories for organization {org}"),
                format!("{}/orgs/{}/repos?per_page={}", self.api_url, org, PER_PAGE),
            ),
            None => (
                "listing repositories visible to the token".to_string(),
                format!("{}/user/repos?per_page={}", self.api_url, PER_PAGE),
            ),
        };

        let mut repos = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(first_page);
        let mut page = 0usize;

        while let Some(url) = next.take() {
            page += 1;
            visited.insert(url.clone());
            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .header(ACCEPT, GITHUB_MEDIA_TYPE)
                .header(USER_AGENT, concat!("gocd-seeder/", env!("CARGO_PKG_VERSION")))
                .header("X-GitHub-Api-Version", "2022-11-28")
                .send()
                .await
                .map_err(|e| ClientError::transport(context.as_str(), e))?;

            let status = response.status();
            if !status.is_success() {
                let headers = response.headers().clone();
                let body = response.text().await.unwrap_or_default();
                return Err(classify_failure(&context, status, &headers, body));
            }

            next = next_page_url(response.headers()).filter(|n| !visited.contains(n));

            let body = response
                .text()
                .await
                .map_err(|e| ClientError::transport(context.as_str(), e))?;
            let batch: Vec<GithubRepository> = serde_json::from_str(&body)
                .map_err(|e| ClientError::decode(format!("repository page {page} ({context})"), e))?;

            debug!(page, count = batch.len(), "fetched github repository page");
            repos.extend(batch.into_iter().map(RepositoryDescriptor::from));
        }

        Ok(repos)
    }
}

/// Map a failed GitHub response onto the client error taxonomy
///
/// `context` names the listing call and prefixes the auth and server messages.
fn classify_failure(
    context: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: String,
) -> ClientError {
    let remaining = header_str(headers, "x-ratelimit-remaining");
    let limited = matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
        && (remaining == Some("0") || headers.contains_key(RETRY_AFTER));

    if limited {
        let reset = header_str(headers, "x-ratelimit-reset").and_then(|r| r.parse().ok());
        warn!(?reset, context, "github rate limit exhausted");
        return ClientError::RateLimited { reset };
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Auth {
            status: status.as_u16(),
            message: format!("{context}: {body}"),
        },
        _ => ClientError::server(status, format!("{context}: {body}")),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Extract the `rel="next"` target from a `Link` header
fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;

    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;

        parts
            .any(|param| param.trim() == r#"rel="next""#)
            .then(|| target.to_string())
    })
}
