//! Seeder Core
//!
//! Core types shared by the GoCD seeder components.
//!
//! This crate contains:
//! - Domain types: repositories, config repo registrations and the naming
//!   convention that links the two
//! - DTOs: wire envelopes returned by the GoCD admin API

pub mod domain;
pub mod dto;
