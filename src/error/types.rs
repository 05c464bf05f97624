//! Error types
//!
//! Defines the error taxonomy shared by the resolver, the file operations
//! facade and the call adapter.

use std::fmt;
use std::io;

/// Errors raised by a single filesystem call
#[derive(Debug)]
pub enum FileError {
    MissingParameter(String),
    InvalidParameter(String),
    InvalidPath(String),
    PermissionDenied(String),
    NotFound(String),
    TypeMismatch(String),
    AlreadyExists(String),
    NotEmpty(String),
    DeleteFailed(String),
    MkdirFailed(String),
    RenameFailed(String),
    CopyFailed(String),
    UnsupportedVerb(String),
    IoFailure(io::Error),
}

impl FileError {
    /// Stable, transport-facing name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::MissingParameter(_) => "MISSING_PARAMETER",
            FileError::InvalidParameter(_) => "INVALID_PARAMETER",
            FileError::InvalidPath(_) => "INVALID_PATH",
            FileError::PermissionDenied(_) => "PERMISSION_DENIED",
            FileError::NotFound(_) => "NOT_FOUND",
            FileError::TypeMismatch(_) => "TYPE_MISMATCH",
            FileError::AlreadyExists(_) => "ALREADY_EXISTS",
            FileError::NotEmpty(_) => "NOT_EMPTY",
            FileError::DeleteFailed(_) => "DELETE_FAILED",
            FileError::MkdirFailed(_) => "MKDIR_FAILED",
            FileError::RenameFailed(_) => "RENAME_FAILED",
            FileError::CopyFailed(_) => "COPY_FAILED",
            FileError::UnsupportedVerb(_) => "UNSUPPORTED_VERB",
            FileError::IoFailure(_) => "IO_FAILURE",
        }
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::MissingParameter(p) => write!(f, "Missing parameter: {}", p),
            FileError::InvalidParameter(p) => write!(f, "Invalid parameter: {}", p),
            FileError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            FileError::PermissionDenied(p) => write!(f, "Permission denied: {}", p),
            FileError::NotFound(p) => write!(f, "Not found: {}", p),
            FileError::TypeMismatch(p) => write!(f, "Type mismatch: {}", p),
            FileError::AlreadyExists(p) => write!(f, "Already exists: {}", p),
            FileError::NotEmpty(p) => write!(f, "Directory is not empty: {}", p),
            FileError::DeleteFailed(p) => write!(f, "Delete failed: {}", p),
            FileError::MkdirFailed(p) => write!(f, "Failed to create directory: {}", p),
            FileError::RenameFailed(p) => write!(f, "Rename failed: {}", p),
            FileError::CopyFailed(p) => write!(f, "Copy failed: {}", p),
            FileError::UnsupportedVerb(v) => write!(f, "Unsupported verb: {}", v),
            FileError::IoFailure(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::IoFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(error: io::Error) -> Self {
        FileError::IoFailure(error)
    }
}

/// Top-level error for the bridge binary
#[derive(Debug)]
pub enum BridgeError {
    File(FileError),
    Config(config::ConfigError),
    IoError(io::Error),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::File(e) => write!(f, "File error: {}", e),
            BridgeError::Config(e) => write!(f, "Configuration error: {}", e),
            BridgeError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<FileError> for BridgeError {
    fn from(error: FileError) -> Self {
        BridgeError::File(error)
    }
}

impl From<config::ConfigError> for BridgeError {
    fn from(error: config::ConfigError) -> Self {
        BridgeError::Config(error)
    }
}

impl From<io::Error> for BridgeError {
    fn from(error: io::Error) -> Self {
        BridgeError::IoError(error)
    }
}

/// Convenience result type for facade operations
pub type FileResult<T> = Result<T, FileError>;
