//! Shared types and models for the Taxi Service
//!
//! This crate contains the domain models, form types and validation rules
//! shared between the backend server and the browser-side WASM module.

pub mod forms;
pub mod models;
pub mod types;
pub mod validation;

pub use forms::*;
pub use models::*;
pub use types::*;
pub use validation::*;
