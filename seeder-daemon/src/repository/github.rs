//! Desired-state provider
//!
//! Produces the set of repositories that should have a GoCD config repo.

use async_trait::async_trait;
use seeder_client::{GithubClient, Result};
use seeder_core::domain::repository::RepositoryDescriptor;

/// Source of the desired set of repositories
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    /// Fetches every repository in scope carrying the marker topic
    ///
    /// The result is complete or the call fails; no partial listings.
    async fn fetch(&self) -> Result<Vec<RepositoryDescriptor>>;
}

/// GitHub-backed provider scoped to an optional organization
pub struct GithubRepositoryProvider {
    client: GithubClient,
    org: Option<String>,
    topic: String,
}

impl GithubRepositoryProvider {
    /// Creates a provider
    ///
    /// # Arguments
    /// * `client` - Authenticated GitHub client
    /// * `org` - Organization to list, or `None` for everything the token sees
    /// * `topic` - Marker topic a repository must carry
    pub fn new(client: GithubClient, org: Option<String>, topic: impl Into<String>) -> Self {
        Self {
            client,
            org,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl RepositoryProvider for GithubRepositoryProvider {
    async fn fetch(&self) -> Result<Vec<RepositoryDescriptor>> {
        self.client
            .tagged_repositories(self.org.as_deref(), &self.topic)
            .await
    }
}
