//! In-memory repository implementations for tests

use async_trait::async_trait;
use seeder_client::{ClientError, ErrorKind, Result};
use seeder_core::domain::config_repo::ConfigRepo;
use seeder_core::domain::naming::RegistrationPrefix;
use seeder_core::domain::repository::RepositoryDescriptor;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{PipelineRegistry, RepositoryProvider};

/// Builds a representative error of the given kind
pub fn error_of(kind: ErrorKind, subject: &str) -> ClientError {
    match kind {
        ErrorKind::Config => ClientError::Config(format!("bad config for {subject}")),
        ErrorKind::Auth => ClientError::Auth {
            status: 401,
            message: "Bad credentials".to_string(),
        },
        ErrorKind::RateLimit => ClientError::RateLimited { reset: None },
        ErrorKind::NotFound => ClientError::NotFound(subject.to_string()),
        ErrorKind::Server => ClientError::Server {
            status: 500,
            status_line: "500 Internal Server Error".to_string(),
            body: format!("failed on {subject}"),
        },
        ErrorKind::Decode => ClientError::Decode {
            what: subject.to_string(),
            message: "expected value".to_string(),
        },
        ErrorKind::Transport => ClientError::transport(subject, request_error()),
    }
}

/// A genuine `reqwest::Error`, produced by building a request for an unparsable URL
fn request_error() -> reqwest::Error {
    match reqwest::Client::new().get("::not a url").build() {
        Ok(_) => panic!("request with an invalid URL unexpectedly built"),
        Err(e) => e,
    }
}

pub fn repo(name: &str) -> RepositoryDescriptor {
    RepositoryDescriptor::new(
        name,
        format!("https://github.com/acme/{name}.git"),
        ["ci-gocd"],
    )
}

/// Provider returning a fixed desired set, or a fixed failure
#[derive(Default)]
pub struct StaticProvider {
    repos: Mutex<Vec<RepositoryDescriptor>>,
    failure: Mutex<Option<ErrorKind>>,
    fetches: AtomicUsize,
}

impl StaticProvider {
    pub fn new(repos: Vec<RepositoryDescriptor>) -> Self {
        Self {
            repos: Mutex::new(repos),
            ..Default::default()
        }
    }

    pub fn failing(kind: ErrorKind) -> Self {
        Self {
            failure: Mutex::new(Some(kind)),
            ..Default::default()
        }
    }

    pub fn set_repos(&self, repos: Vec<RepositoryDescriptor>) {
        *self.repos.lock().unwrap() = repos;
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryProvider for StaticProvider {
    async fn fetch(&self) -> Result<Vec<RepositoryDescriptor>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(kind) = *self.failure.lock().unwrap() {
            return Err(error_of(kind, "repository listing"));
        }
        Ok(self.repos.lock().unwrap().clone())
    }
}

/// Registry call, recorded in invocation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Get(String),
    Create(String),
    Delete(String),
}

#[derive(Default)]
struct RegistryState {
    repos: BTreeMap<String, ConfigRepo>,
    calls: Vec<Call>,
    get_failures: HashMap<String, ErrorKind>,
    create_failures: HashSet<String>,
    delete_failures: HashSet<String>,
    list_failure: Option<ErrorKind>,
}

/// Registry holding config repos in a map
#[derive(Default)]
pub struct InMemoryRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a registration as if created by the seeder under `prefix`
    pub fn with_registration(self, name: &str, prefix: &RegistrationPrefix) -> Self {
        let config_repo = ConfigRepo::for_repository(&repo(name), prefix);
        self.with_config_repo(config_repo)
    }

    pub fn with_config_repo(self, config_repo: ConfigRepo) -> Self {
        self.state
            .lock()
            .unwrap()
            .repos
            .insert(config_repo.id.clone(), config_repo);
        self
    }

    /// Makes `get` fail for a registration ID
    pub fn fail_get(self, id: &str, kind: ErrorKind) -> Self {
        self.state
            .lock()
            .unwrap()
            .get_failures
            .insert(id.to_string(), kind);
        self
    }

    /// Makes `get` fail for each of the given registration IDs
    pub fn fail_every_get(self, kind: ErrorKind, ids: &[&str]) -> Self {
        ids.iter().fold(self, |registry, id| registry.fail_get(id, kind))
    }

    pub fn fail_create(self, id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .create_failures
            .insert(id.to_string());
        self
    }

    pub fn fail_delete(self, id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .delete_failures
            .insert(id.to_string());
        self
    }

    pub fn fail_list(self, kind: ErrorKind) -> Self {
        self.state.lock().unwrap().list_failure = Some(kind);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn ids(&self) -> Vec<String> {
        self.state.lock().unwrap().repos.keys().cloned().collect()
    }

    pub fn creates(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl PipelineRegistry for InMemoryRegistry {
    async fn list_all(&self) -> Result<Vec<ConfigRepo>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::List);

        if let Some(kind) = state.list_failure {
            return Err(error_of(kind, "config repo collection"));
        }
        Ok(state.repos.values().cloned().collect())
    }

    async fn get(&self, repository_name: &str, prefix: &RegistrationPrefix) -> Result<ConfigRepo> {
        let id = prefix.registration_id(repository_name);
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Get(id.clone()));

        if let Some(kind) = state.get_failures.get(&id) {
            return Err(error_of(*kind, &id));
        }
        state
            .repos
            .get(&id)
            .cloned()
            .ok_or(ClientError::NotFound(id))
    }

    async fn create(
        &self,
        repo: &RepositoryDescriptor,
        prefix: &RegistrationPrefix,
    ) -> Result<ConfigRepo> {
        let config_repo = ConfigRepo::for_repository(repo, prefix);
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Create(config_repo.id.clone()));

        if state.create_failures.contains(&config_repo.id) {
            return Err(error_of(ErrorKind::Server, &config_repo.id));
        }
        if state.repos.contains_key(&config_repo.id) {
            return Err(ClientError::Server {
                status: 409,
                status_line: "409 Conflict".to_string(),
                body: format!("config repo {} already exists", config_repo.id),
            });
        }

        state
            .repos
            .insert(config_repo.id.clone(), config_repo.clone());
        Ok(config_repo)
    }

    async fn delete(&self, config_repo: &ConfigRepo) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(config_repo.id.clone()));

        if state.delete_failures.contains(&config_repo.id) {
            return Err(error_of(ErrorKind::Server, &config_repo.id));
        }
        state.repos.remove(&config_repo.id);
        Ok(())
    }
}
