//! Foundational data structures, error types, and field definitions.

pub mod error;
pub mod field;
pub mod models;
