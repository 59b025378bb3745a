//! Scheduler layer
//!
//! Drives reconciliation cycles on a fixed interval and coordinates a
//! bounded, graceful shutdown.

pub mod lifecycle;

pub use lifecycle::{Scheduler, SchedulerState, wait_for_stop};
