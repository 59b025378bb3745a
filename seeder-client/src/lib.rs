//! Seeder HTTP Clients
//!
//! Typed HTTP clients for the two systems the seeder reconciles:
//! - [`GithubClient`] lists repositories visible to an access token
//! - [`GocdClient`] manages config repo registrations through the GoCD admin API
//!
//! Both clients map HTTP failures onto the shared [`ClientError`] taxonomy so
//! callers can branch on [`ErrorKind`] instead of status strings.
//!
//! # Example
//!
//! ```no_run
//! use seeder_client::GocdClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let gocd = GocdClient::new("http://localhost:8081");
//!
//!     for repo in gocd.list_config_repos().await? {
//!         println!("{} -> {}", repo.id, repo.material_url());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod github;
pub mod gocd;

// Re-export commonly used types
pub use error::{ClientError, ErrorKind, Result};
pub use github::GithubClient;
pub use gocd::{BasicAuth, GocdClient};
