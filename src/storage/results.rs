//! Storage result types
//!
//! Defines result structures returned by storage operations. Field names
//! serialize in camelCase for the call boundary.

use serde::Serialize;

use crate::storage::permissions::PermissionState;

/// Snapshot of a filesystem entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDescriptor {
    pub is_file: bool,
    pub is_directory: bool,
    pub name: String,
    pub full_path: String,
    #[serde(rename = "nativeURL")]
    pub native_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Directory,
}

/// Result of a read operation
#[derive(Debug, Clone, Serialize)]
pub struct ReadResult {
    pub data: String,
}

/// Result of an operation reporting a locator
#[derive(Debug, Clone, Serialize)]
pub struct UriResult {
    pub uri: String,
}

/// Result of a directory listing operation
#[derive(Debug, Clone, Serialize)]
pub struct ReaddirResult {
    pub entries: Vec<EntryDescriptor>,
}

/// Result of a stat operation
#[derive(Debug, Clone, Serialize)]
pub struct StatResult {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub size: u64,
    /// Milliseconds since the UNIX epoch
    pub mtime: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctime: Option<u64>,
    pub uri: String,
}

/// Reduced stat
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResult {
    pub modification_time: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExistsResult {
    pub exists: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<EntryType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FreeSpaceResult {
    pub free: u64,
}

/// Root of a requested file system
#[derive(Debug, Clone, Serialize)]
pub struct FileSystemInfo {
    pub name: String,
    pub root: EntryDescriptor,
}

/// Locators of the configured base directories
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoriesResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_storage_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_root_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_data_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_directory: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionResult {
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionStatus {
    pub public_storage: PermissionState,
}
