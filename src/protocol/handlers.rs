//! Request handlers
//!
//! Dispatches a parsed request to the file operations facade and shapes the
//! outcome into a response envelope. Any transport can drive these
//! functions: `execute` is a direct synchronous call, `handle_request` runs
//! it on the blocking pool.

use log::{debug, warn};
use serde::Serialize;
use serde_json::{Value, json};
use std::io;
use std::sync::Arc;
use tokio::task;

use crate::error::{FileError, FileResult};
use crate::protocol::commands::{Request, Verb, parse_verb};
use crate::protocol::parser::Params;
use crate::protocol::responses::Response;
use crate::storage::{FileStorage, FileSystemType, GetOptions, ReadOptions, WriteOptions};

/// Handle one request end to end
pub async fn handle_request(storage: Arc<FileStorage>, request: Request) -> Response {
    let Request { id, verb, params } = request;
    let parsed = parse_verb(&verb);
    debug!("Handling {} ({:?})", verb, parsed);

    let outcome = match parsed {
        Verb::Unknown => Err(FileError::UnsupportedVerb(verb.clone())),
        Verb::RequestPermissions => to_value(storage.request_permissions().await),
        _ => {
            let blocking = task::spawn_blocking(move || execute(&storage, parsed, &Params::new(&params)));
            match blocking.await {
                Ok(outcome) => outcome,
                Err(e) => Err(FileError::IoFailure(io::Error::other(e))),
            }
        }
    };

    match outcome {
        Ok(result) => Response::success(id, result),
        Err(err) => {
            warn!("{} failed: {}", verb, err);
            Response::failure(id, &err)
        }
    }
}

/// Run a verb synchronously against the facade
pub fn execute(storage: &FileStorage, verb: Verb, params: &Params<'_>) -> FileResult<Value> {
    match verb {
        Verb::GetFile => {
            let path = params.required_str("path")?;
            to_value(storage.get_file(path, params.alias("directory"), get_options(params))?)
        }
        Verb::GetDirectory => {
            let path = params.required_str("path")?;
            to_value(storage.get_directory(path, params.alias("directory"), get_options(params))?)
        }
        Verb::ReadFile => {
            let path = params.required_str("path")?;
            let options = ReadOptions {
                encoding: params.encoding("encoding"),
                offset: params.optional_i64("offset").unwrap_or(0),
                length: params.optional_i64("length"),
            };
            to_value(storage.read_file(path, params.alias("directory"), options)?)
        }
        Verb::ReadAsDataUrl => {
            let path = params.required_str("path")?;
            to_value(storage.read_as_data_url(path, params.alias("directory"))?)
        }
        Verb::WriteFile | Verb::AppendFile => {
            let path = params.required_str("path")?;
            let data = params.required_str("data")?;
            let options = write_options(params);
            let alias = params.alias("directory");
            let result = if verb == Verb::AppendFile {
                storage.append_file(path, alias, data, options)?
            } else {
                storage.write_file(path, alias, data, options)?
            };
            to_value(result)
        }
        Verb::DeleteFile => {
            let path = params.required_str("path")?;
            storage.delete_file(path, params.alias("directory"))?;
            Ok(json!({}))
        }
        Verb::Mkdir => {
            let path = params.required_str("path")?;
            storage.mkdir(path, params.alias("directory"), params.bool_or("recursive", false))?;
            Ok(json!({}))
        }
        Verb::Rmdir => {
            let path = params.required_str("path")?;
            storage.rmdir(path, params.alias("directory"), params.bool_or("recursive", false))?;
            Ok(json!({}))
        }
        Verb::Readdir => {
            let path = params.required_str("path")?;
            to_value(storage.readdir(path, params.alias("directory"))?)
        }
        Verb::Stat => {
            let path = params.required_str("path")?;
            to_value(storage.stat(path, params.alias("directory"))?)
        }
        Verb::GetMetadata => {
            let path = params.required_str("path")?;
            to_value(storage.get_metadata(path, params.alias("directory"))?)
        }
        Verb::Rename | Verb::Move => {
            let from = params.required_str("from")?;
            let to = params.required_str("to")?;
            storage.move_entry(
                from,
                params.alias("directory"),
                to,
                params.optional_alias("toDirectory"),
            )?;
            Ok(json!({}))
        }
        Verb::Copy => {
            let from = params.required_str("from")?;
            let to = params.required_str("to")?;
            to_value(storage.copy(
                from,
                params.alias("directory"),
                to,
                params.optional_alias("toDirectory"),
            )?)
        }
        Verb::Exists => {
            let path = params.required_str("path")?;
            to_value(storage.exists(path, params.alias("directory"))?)
        }
        Verb::GetUri => {
            let path = params.required_str("path")?;
            to_value(storage.get_uri(path, params.alias("directory"))?)
        }
        Verb::Truncate => {
            let path = params.required_str("path")?;
            let size = params
                .optional_i64("size")
                .ok_or_else(|| FileError::MissingParameter("size".into()))?;
            if size < 0 {
                return Err(FileError::InvalidParameter(format!(
                    "size must not be negative: {}",
                    size
                )));
            }
            storage.truncate(path, params.alias("directory"), size as u64)?;
            Ok(json!({}))
        }
        Verb::GetFreeDiskSpace => to_value(storage.free_disk_space()),
        Verb::RequestFileSystem => {
            let fs_type = FileSystemType::from_code(params.optional_i64("type").unwrap_or(1));
            to_value(storage.request_file_system(fs_type)?)
        }
        Verb::ResolveLocalFileSystemUrl => {
            let url = params.required_str("url")?;
            to_value(storage.resolve_local_url(url)?)
        }
        Verb::GetDirectories => to_value(storage.directories()),
        Verb::GetPluginVersion => to_value(storage.plugin_version()),
        Verb::CheckPermissions => to_value(storage.check_permissions()),
        // Prompting is asynchronous; there is no blocking form of this verb
        Verb::RequestPermissions => Err(FileError::UnsupportedVerb("requestPermissions".into())),
        Verb::Unknown => Err(FileError::UnsupportedVerb("unknown".into())),
    }
}

fn get_options(params: &Params<'_>) -> GetOptions {
    let options = params.nested("options");
    GetOptions {
        create: options.bool_or("create", false),
        exclusive: options.bool_or("exclusive", false),
    }
}

fn write_options(params: &Params<'_>) -> WriteOptions {
    WriteOptions {
        encoding: params.encoding("encoding"),
        append: params.bool_or("append", false),
        recursive: params.bool_or("recursive", false),
        position: params.optional_i64("position"),
    }
}

fn to_value<T: Serialize>(result: T) -> FileResult<Value> {
    serde_json::to_value(result).map_err(|e| FileError::IoFailure(io::Error::other(e)))
}
