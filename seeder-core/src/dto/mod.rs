//! Data Transfer Objects for the external APIs
//!
//! Lightweight representations of the JSON bodies exchanged with GitHub and
//! the GoCD admin API.

pub mod config_repo;
pub mod github;
