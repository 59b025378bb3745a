//! GoCD config repo collection envelope

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::config_repo::{ConfigRepo, Links};

/// Key of the embedded collection in the list response
pub const CONFIG_REPOS_KEY: &str = "config_repos";

/// Response body of `GET /go/api/admin/config_repos`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigRepoCollection {
    #[serde(rename = "_links", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: Links,
    #[serde(rename = "_embedded", default)]
    pub embedded: BTreeMap<String, Vec<ConfigRepo>>,
}

impl ConfigRepoCollection {
    /// Unwraps the embedded config repos; a missing collection is empty
    pub fn into_config_repos(mut self) -> Vec<ConfigRepo> {
        self.embedded.remove(CONFIG_REPOS_KEY).unwrap_or_default()
    }
}
