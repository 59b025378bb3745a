//! GitHub repository DTOs

use serde::{Deserialize, Serialize};

use crate::domain::repository::RepositoryDescriptor;

/// Subset of the GitHub repository object the seeder reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubRepository {
    pub name: String,
    pub clone_url: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl From<GithubRepository> for RepositoryDescriptor {
    fn from(repo: GithubRepository) -> Self {
        RepositoryDescriptor::new(repo.name, repo.clone_url, repo.topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_repository_conversion() {
        let json = r#"{
            "id": 1296269,
            "name": "svcA",
            "full_name": "acme/svcA",
            "clone_url": "https://github.com/acme/svcA.git",
            "topics": ["ci-gocd", "rust"]
        }"#;

        let repo: RepositoryDescriptor = serde_json::from_str::<GithubRepository>(json)
            .unwrap()
            .into();
        assert_eq!(repo.name, "svcA");
        assert_eq!(repo.clone_url, "https://github.com/acme/svcA.git");
        assert!(repo.has_topic("ci-gocd"));
        assert!(repo.has_topic("rust"));
    }
}
