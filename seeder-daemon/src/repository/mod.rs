//! Repository layer
//!
//! Capability interfaces over the two external systems the seeder
//! reconciles. Production implementations wrap the HTTP clients from
//! `seeder-client`; tests swap in the in-memory variants.

mod github;
mod gocd;
#[cfg(test)]
pub mod memory;

// Re-export traits
pub use github::RepositoryProvider;
pub use gocd::PipelineRegistry;

// Re-export implementations
pub use github::GithubRepositoryProvider;
