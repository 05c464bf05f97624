//! Error handlers
//!
//! Maps errors onto the W3C FileError codes reported to callers.

use crate::error::types::{BridgeError, FileError};
use log::error;

pub const NOT_FOUND_ERR: u16 = 1;
pub const SECURITY_ERR: u16 = 2;
pub const NOT_READABLE_ERR: u16 = 4;
pub const ENCODING_ERR: u16 = 5;
pub const NO_MODIFICATION_ALLOWED_ERR: u16 = 6;
pub const SYNTAX_ERR: u16 = 8;
pub const INVALID_MODIFICATION_ERR: u16 = 9;
pub const TYPE_MISMATCH_ERR: u16 = 11;
pub const PATH_EXISTS_ERR: u16 = 12;

/// Log a fatal bridge error
pub fn handle_error(err: &BridgeError) {
    error!("Bridge error: {}", err);
}

/// Convert a file error to its W3C FileError code
pub fn error_to_code(err: &FileError) -> u16 {
    match err {
        FileError::MissingParameter(_) => SYNTAX_ERR,
        FileError::InvalidParameter(_) => SYNTAX_ERR,
        FileError::UnsupportedVerb(_) => SYNTAX_ERR,
        FileError::InvalidPath(_) => ENCODING_ERR,
        FileError::PermissionDenied(_) => SECURITY_ERR,
        FileError::NotFound(_) => NOT_FOUND_ERR,
        FileError::TypeMismatch(_) => TYPE_MISMATCH_ERR,
        FileError::AlreadyExists(_) => PATH_EXISTS_ERR,
        FileError::NotEmpty(_) => INVALID_MODIFICATION_ERR,
        FileError::DeleteFailed(_) => NO_MODIFICATION_ALLOWED_ERR,
        FileError::MkdirFailed(_) => NO_MODIFICATION_ALLOWED_ERR,
        FileError::RenameFailed(_) => NO_MODIFICATION_ALLOWED_ERR,
        FileError::CopyFailed(_) => NO_MODIFICATION_ALLOWED_ERR,
        FileError::IoFailure(_) => NOT_READABLE_ERR,
    }
}
