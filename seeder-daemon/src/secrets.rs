//! Secret lookup
//!
//! Credentials can be injected directly through the environment or mounted as
//! files, in which case `<KEY>_FILE` holds the path.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub const GITHUB_API_KEY: &str = "GITHUB_API_KEY";
pub const GOCD_USER: &str = "GOCD_USER";
pub const GOCD_PASSWORD: &str = "GOCD_PASSWORD";

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret {0} is not set")]
    Missing(String),

    #[error("failed to read {key} from {}: {source}", path.display())]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of secret values, keyed by variable name
pub trait SecretSource: Send + Sync {
    fn read(&self, key: &str) -> Result<String, SecretError>;
}

/// Reads secrets from the process environment
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretSource;

impl SecretSource for EnvSecretSource {
    fn read(&self, key: &str) -> Result<String, SecretError> {
        resolve(key, |name| std::env::var(name).ok())
    }
}

/// Resolves `key` through `lookup`, preferring the `<KEY>_FILE` indirection
fn resolve(key: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String, SecretError> {
    let file_key = format!("{key}_FILE");

    match lookup(&file_key).filter(|path| !path.is_empty()) {
        Some(path) => read_file(key, Path::new(&path)),
        None => lookup(key).ok_or_else(|| SecretError::Missing(key.to_string())),
    }
}

fn read_file(key: &str, path: &Path) -> Result<String, SecretError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SecretError::Io {
        key: key.to_string(),
        path: path.to_path_buf(),
        source,
    })?;

    Ok(contents.trim_end_matches(['\r', '\n']).to_string())
}

/// Like [`SecretSource::read`], but an unset secret is `None` instead of an error
pub fn read_optional(source: &dyn SecretSource, key: &str) -> Result<Option<String>, SecretError> {
    match source.read(key) {
        Ok(value) => Ok(Some(value)),
        Err(SecretError::Missing(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Map-backed source for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MapSecretSource(pub std::collections::HashMap<String, String>);

#[cfg(test)]
impl MapSecretSource {
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
impl SecretSource for MapSecretSource {
    fn read(&self, key: &str) -> Result<String, SecretError> {
        resolve(key, |name| self.0.get(name).cloned())
    }
}
