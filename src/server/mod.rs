//! Bridge server
//!
//! Drives the call adapter from a line-oriented byte stream (stdin/stdout
//! in the binary).

pub mod core;

pub use core::Server;
