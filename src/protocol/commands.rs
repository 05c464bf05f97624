//! Module `commands`
//!
//! Defines the verbs accepted at the call boundary and the request envelope
//! that carries them.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A filesystem verb parsed from a request.
///
/// Unrecognised names map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    GetFile,
    GetDirectory,
    ReadFile,
    ReadAsDataUrl,
    WriteFile,
    AppendFile,
    DeleteFile,
    Mkdir,
    Rmdir,
    Readdir,
    Stat,
    GetMetadata,
    Rename,
    Move,
    Copy,
    Exists,
    GetUri,
    Truncate,
    GetFreeDiskSpace,
    RequestFileSystem,
    ResolveLocalFileSystemUrl,
    GetDirectories,
    GetPluginVersion,
    CheckPermissions,
    RequestPermissions,
    Unknown,
}

/// One call: verb name plus its parameter mapping
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Value,
    pub verb: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Parses a verb name into the `Verb` enum
pub fn parse_verb(raw: &str) -> Verb {
    match raw.trim() {
        "getFile" => Verb::GetFile,
        "getDirectory" => Verb::GetDirectory,
        "readFile" => Verb::ReadFile,
        "readAsDataURL" => Verb::ReadAsDataUrl,
        "writeFile" => Verb::WriteFile,
        "appendFile" => Verb::AppendFile,
        "deleteFile" => Verb::DeleteFile,
        "mkdir" => Verb::Mkdir,
        "rmdir" => Verb::Rmdir,
        "readdir" => Verb::Readdir,
        "stat" => Verb::Stat,
        "getMetadata" => Verb::GetMetadata,
        "rename" => Verb::Rename,
        "move" => Verb::Move,
        "copy" => Verb::Copy,
        "exists" => Verb::Exists,
        "getUri" => Verb::GetUri,
        "truncate" => Verb::Truncate,
        "getFreeDiskSpace" => Verb::GetFreeDiskSpace,
        "requestFileSystem" => Verb::RequestFileSystem,
        "resolveLocalFileSystemURL" => Verb::ResolveLocalFileSystemUrl,
        "getDirectories" => Verb::GetDirectories,
        "getPluginVersion" => Verb::GetPluginVersion,
        "checkPermissions" => Verb::CheckPermissions,
        "requestPermissions" => Verb::RequestPermissions,
        _ => Verb::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_are_case_sensitive() {
        assert_eq!(parse_verb("readAsDataURL"), Verb::ReadAsDataUrl);
        assert_eq!(parse_verb(" move "), Verb::Move);
        assert_eq!(parse_verb("READFILE"), Verb::Unknown);
        assert_eq!(parse_verb(""), Verb::Unknown);
    }
}
