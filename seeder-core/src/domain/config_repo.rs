//! GoCD config repo domain types
//!
//! A config repo tells GoCD to poll a git repository for pipeline definitions
//! (`ci.gocd.yaml`). The seeder only ever creates git materials on `master`
//! handled by the YAML config plugin.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::naming::RegistrationPrefix;
use crate::domain::repository::RepositoryDescriptor;

/// Plugin that parses `ci.gocd.yaml` files
pub const YAML_CONFIG_PLUGIN: &str = "yaml.config.plugin";

/// Material type for git repositories
pub const GIT_MATERIAL: &str = "git";

/// Branch GoCD polls for pipeline definitions
pub const DEFAULT_BRANCH: &str = "master";

/// HAL links (`{"self": {"href": "..."}}`)
pub type Links = BTreeMap<String, BTreeMap<String, String>>;

/// Config repo registration as stored by GoCD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRepo {
    #[serde(rename = "_links", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub links: Links,
    pub id: String,
    pub plugin_id: String,
    pub material: Material,
    /// Plugin configuration, passed through untouched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configuration: Vec<serde_json::Value>,
}

/// Material GoCD polls for a config repo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    #[serde(rename = "type")]
    pub material_type: String,
    pub attributes: MaterialAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialAttributes {
    pub url: String,
    /// Repository name; GoCD reports `null` for materials created elsewhere
    #[serde(default)]
    pub name: Option<String>,
    pub branch: String,
    pub auto_update: bool,
}

impl ConfigRepo {
    /// Builds the registration the seeder wants for a repository
    pub fn for_repository(repo: &RepositoryDescriptor, prefix: &RegistrationPrefix) -> Self {
        Self {
            links: Links::new(),
            id: prefix.registration_id(&repo.name),
            plugin_id: YAML_CONFIG_PLUGIN.to_string(),
            material: Material {
                material_type: GIT_MATERIAL.to_string(),
                attributes: MaterialAttributes {
                    url: repo.clone_url.clone(),
                    name: Some(repo.name.clone()),
                    branch: DEFAULT_BRANCH.to_string(),
                    auto_update: true,
                },
            },
            configuration: Vec::new(),
        }
    }

    /// Name recorded on the material, if any
    pub fn material_name(&self) -> Option<&str> {
        self.material.attributes.name.as_deref()
    }

    pub fn material_url(&self) -> &str {
        &self.material.attributes.url
    }
}
