//! Core domain types
//!
//! These types are cycle-scoped values: they are fetched fresh from GitHub and
//! GoCD on every reconciliation pass and never persisted by the seeder.

pub mod config_repo;
pub mod naming;
pub mod repository;
