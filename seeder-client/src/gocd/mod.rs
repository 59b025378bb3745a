//! GoCD admin API client
//!
//! Talks to the versioned config repo endpoints under
//! `/go/api/admin/config_repos`. Every request carries the versioned `Accept`
//! header; basic authentication is attached only when both a username and a
//! password are configured, anonymous access is otherwise assumed.

mod config_repos;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::{ClientError, Result};

/// Administrative sub-path for config repos
pub const CONFIG_REPOS_PATH: &str = "/go/api/admin/config_repos";

/// Media type of the config repo API version the seeder speaks
pub const CONFIG_REPOS_MEDIA_TYPE: &str = "application/vnd.go.cd.v1+json";

/// Username/password pair for GoCD basic authentication
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    /// Returns credentials only when both parts are present and non-empty
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(Self { username, password })
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP client for the GoCD config repo API
#[derive(Debug, Clone)]
pub struct GocdClient {
    /// Base URL of the GoCD server (e.g., "http://localhost:8081")
    base_url: String,
    /// Optional basic-auth credentials
    auth: Option<BasicAuth>,
    /// HTTP client instance
    client: Client,
}

impl GocdClient {
    /// Create a new GoCD client for anonymous access
    ///
    /// # Example
    /// ```
    /// use seeder_client::GocdClient;
    ///
    /// let client = GocdClient::new("http://localhost:8081/");
    /// assert_eq!(client.base_url(), "http://localhost:8081");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new GoCD client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use seeder_client::GocdClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GocdClient::with_client("http://localhost:8081", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth: None,
            client,
        }
    }

    /// Attach basic-auth credentials to every request
    pub fn with_basic_auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.auth = auth;
        self
    }

    /// Get the base URL of the GoCD server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the config repo collection
    pub fn config_repos_url(&self) -> String {
        format!("{}{}", self.base_url, CONFIG_REPOS_PATH)
    }

    pub fn has_credentials(&self) -> bool {
        self.auth.is_some()
    }

    // =============================================================================
    // Request Helpers
    // =============================================================================

    /// Build a request against the collection, or a single config repo when
    /// `id` is given
    fn request(&self, method: Method, id: Option<&str>) -> RequestBuilder {
        let url = match id {
            Some(id) => format!("{}/{}", self.config_repos_url(), id),
            None => self.config_repos_url(),
        };

        let builder = self
            .client
            .request(method, url)
            .header(ACCEPT, CONFIG_REPOS_MEDIA_TYPE)
            .header(CONTENT_TYPE, "application/json");

        match &self.auth {
            Some(auth) => builder.basic_auth(&auth.username, Some(&auth.password)),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| ClientError::transport(context, e))
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Turn a non-success status into a server error carrying the body
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::server(status, body));
        }

        Ok(response)
    }

    /// Read the body and decode it as JSON
    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::transport(format!("reading {what}"), e))?;

        serde_json::from_str(&body).map_err(|e| ClientError::decode(what, e))
    }
}
