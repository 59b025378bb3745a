//! Actual-state registry
//!
//! Config repo registrations as GoCD knows them.

use async_trait::async_trait;
use seeder_client::{GocdClient, Result};
use seeder_core::domain::config_repo::ConfigRepo;
use seeder_core::domain::naming::RegistrationPrefix;
use seeder_core::domain::repository::RepositoryDescriptor;

/// Registry of pipeline-definition registrations
#[async_trait]
pub trait PipelineRegistry: Send + Sync {
    /// Fetches every registration in one call
    async fn list_all(&self) -> Result<Vec<ConfigRepo>>;

    /// Looks up the registration for a repository
    ///
    /// Reports [`seeder_client::ClientError::NotFound`] when none exists.
    async fn get(&self, repository_name: &str, prefix: &RegistrationPrefix) -> Result<ConfigRepo>;

    /// Registers a repository; callers must have seen `get` report not found
    async fn create(
        &self,
        repo: &RepositoryDescriptor,
        prefix: &RegistrationPrefix,
    ) -> Result<ConfigRepo>;

    /// Removes a registration by its ID
    async fn delete(&self, config_repo: &ConfigRepo) -> Result<()>;
}

#[async_trait]
impl PipelineRegistry for GocdClient {
    async fn list_all(&self) -> Result<Vec<ConfigRepo>> {
        self.list_config_repos().await
    }

    async fn get(&self, repository_name: &str, prefix: &RegistrationPrefix) -> Result<ConfigRepo> {
        self.get_config_repo(repository_name, prefix).await
    }

    async fn create(
        &self,
        repo: &RepositoryDescriptor,
        prefix: &RegistrationPrefix,
    ) -> Result<ConfigRepo> {
        self.create_config_repo(repo, prefix).await
    }

    async fn delete(&self, config_repo: &ConfigRepo) -> Result<()> {
        self.delete_config_repo(config_repo).await
    }
}
