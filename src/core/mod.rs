//! Core library components.

pub mod collection;
pub mod diff;
pub mod reconcile;
pub mod state;
pub mod types;
pub mod vault;
