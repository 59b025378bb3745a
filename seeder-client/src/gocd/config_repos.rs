//! Config repo API endpoints

use reqwest::{Method, StatusCode};
use seeder_core::domain::config_repo::ConfigRepo;
use seeder_core::domain::naming::RegistrationPrefix;
use seeder_core::domain::repository::RepositoryDescriptor;
use seeder_core::dto::config_repo::ConfigRepoCollection;
use tracing::debug;

use super::GocdClient;
use crate::error::{ClientError, Result};

impl GocdClient {
    // =============================================================================
    // Config Repo Management
    // =============================================================================

    /// List every config repo registered in GoCD
    ///
    /// An envelope without an embedded collection yields an empty list.
    pub async fn list_config_repos(&self) -> Result<Vec<ConfigRepo>> {
        let request = self.request(Method::GET, None);
        let response = self.send(request, "listing gocd config repos").await?;
        let response = Self::check_status(response).await?;

        let collection: ConfigRepoCollection =
            Self::decode(response, "config repo collection").await?;
        let repos = collection.into_config_repos();

        debug!(count = repos.len(), "fetched gocd config repos");
        Ok(repos)
    }

    /// Get the config repo registered for a repository
    ///
    /// # Arguments
    /// * `repository_name` - Repository name the registration was created for
    /// * `prefix` - Prefix used to derive the registration ID
    ///
    /// # Errors
    /// [`ClientError::NotFound`] when GoCD answers 404, so callers can take
    /// the create path.
    pub async fn get_config_repo(
        &self,
        repository_name: &str,
        prefix: &RegistrationPrefix,
    ) -> Result<ConfigRepo> {
        let id = prefix.registration_id(repository_name);
        let request = self.request(Method::GET, Some(&id));
        let response = self
            .send(request, &format!("retrieving gocd config repo {id}"))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id));
        }

        let response = Self::check_status(response).await?;
        Self::decode(response, &format!("config repo {id}")).await
    }

    /// Register a config repo for a repository
    ///
    /// Not idempotent: creating an ID that already exists is a conflict
    /// reported by GoCD as a server error.
    ///
    /// # Returns
    /// The server's representation, carrying the authoritative ID and links
    pub async fn create_config_repo(
        &self,
        repo: &RepositoryDescriptor,
        prefix: &RegistrationPrefix,
    ) -> Result<ConfigRepo> {
        let config_repo = ConfigRepo::for_repository(repo, prefix);
        let request = self.request(Method::POST, None).json(&config_repo);
        let response = self
            .send(
                request,
                &format!("creating gocd config repo {}", config_repo.id),
            )
            .await?;
        let response = Self::check_status(response).await?;

        Self::decode(response, &format!("created config repo {}", config_repo.id)).await
    }

    /// Delete a config repo by its ID
    pub async fn delete_config_repo(&self, config_repo: &ConfigRepo) -> Result<()> {
        let request = self.request(Method::DELETE, Some(&config_repo.id));
        let response = self
            .send(
                request,
                &format!("deleting gocd config repo {}", config_repo.id),
            )
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}
