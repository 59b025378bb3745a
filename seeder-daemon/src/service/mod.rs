//! Service layer
//!
//! Business logic of the seeder: computing the delta between GitHub and GoCD
//! and applying it through the repository layer.

mod delta;
mod reconciler;

pub use reconciler::{CycleReport, Reconciler};
