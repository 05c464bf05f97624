//! Directory-scoped file storage
//!
//! Alias resolution, entry descriptors, permission gating and the file
//! operations facade.

pub mod directory;
pub mod encoding;
pub mod filesystem;
pub mod operations;
pub mod permissions;
pub mod results;
pub mod validation;

// Re-export commonly used types
pub use directory::{DirectoryAlias, FileSystemType};
pub use encoding::Encoding;
pub use operations::{FileStorage, GetOptions, ReadOptions, WriteOptions};
pub use permissions::{PermissionGate, PermissionScope, PermissionState, PolicyPermissionGate};
pub use validation::DirectoryResolver;
