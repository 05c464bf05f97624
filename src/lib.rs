//! Scoped filesystem bridge
//!
//! Maps (directory alias, relative path) pairs onto platform paths and
//! exposes filesystem verbs behind a uniform result/error contract.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod storage;

pub use config::BridgeConfig;
pub use server::Server;
pub use storage::FileStorage;
