//! Error handling
//!
//! Defines error types and their mapping onto caller-facing codes.

pub mod handlers;
pub mod types;

pub use types::*;
