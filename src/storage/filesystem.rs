//! Entry descriptors
//!
//! Shapes a resolved path into the descriptor and locator strings returned
//! to callers.

use std::fs;
use std::path::Path;
use url::Url;

use crate::storage::results::EntryDescriptor;

/// Describe a path from a single metadata query.
///
/// Callers confirm existence first. A path removed in between is reported
/// as neither a file nor a directory.
pub fn describe(path: &Path) -> EntryDescriptor {
    let (is_file, is_directory) = match fs::metadata(path) {
        Ok(metadata) => (metadata.is_file(), metadata.is_dir()),
        Err(_) => (false, false),
    };

    EntryDescriptor {
        is_file,
        is_directory,
        name: entry_name(path),
        full_path: path.to_string_lossy().to_string(),
        native_url: file_uri(path),
    }
}

/// Last path segment
pub fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Render a `file://` locator for a path
pub fn file_uri(path: &Path) -> String {
    match Url::from_file_path(path) {
        Ok(url) => url.to_string(),
        Err(_) => format!("file://{}", path.display()),
    }
}

/// Infer a MIME type from the file extension
pub fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}
