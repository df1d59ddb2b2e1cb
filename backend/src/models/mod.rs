//! Database models for the Taxi Service
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
