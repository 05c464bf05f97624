//! Storage operations
//!
//! The file operations facade: one method per filesystem verb, built on the
//! directory resolver and the entry descriptor builder. OS failures are
//! translated into `FileError` kinds.

use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::BridgeConfig;
use crate::error::{FileError, FileResult};
use crate::storage::directory::{DirectoryAlias, FileSystemType};
use crate::storage::encoding::{Encoding, payload_bytes, to_base64};
use crate::storage::filesystem::{describe, file_uri, mime_type};
use crate::storage::permissions::{
    PermissionGate, PermissionScope, PermissionState, PolicyPermissionGate,
};
use crate::storage::results::{
    DirectoriesResult, EntryDescriptor, EntryType, ExistsResult, FileSystemInfo, FreeSpaceResult,
    MetadataResult, PermissionStatus, ReadResult, ReaddirResult, StatResult, UriResult,
    VersionResult,
};
use crate::storage::validation::{DirectoryResolver, normalize_lexically};

/// Create-or-open flags for `get_file` / `get_directory`
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions {
    pub create: bool,
    pub exclusive: bool,
}

/// Byte range and output encoding for `read_file`
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    pub encoding: Option<Encoding>,
    pub offset: i64,
    pub length: Option<i64>,
}

/// Payload handling for `write_file`
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub encoding: Option<Encoding>,
    pub append: bool,
    pub recursive: bool,
    pub position: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteStrategy {
    Positional(u64),
    Append,
    Overwrite,
}

impl WriteStrategy {
    /// Position wins over append; both only apply to an existing file
    fn choose(options: &WriteOptions, target_exists: bool) -> Self {
        match (options.position, target_exists) {
            (Some(position), true) => WriteStrategy::Positional(position.max(0) as u64),
            (None, true) if options.append => WriteStrategy::Append,
            _ => WriteStrategy::Overwrite,
        }
    }
}

/// Directory-scoped filesystem facade
pub struct FileStorage {
    resolver: DirectoryResolver,
    gate: Arc<dyn PermissionGate>,
    copy_buffer_size: usize,
}

impl FileStorage {
    pub fn new(
        resolver: DirectoryResolver,
        gate: Arc<dyn PermissionGate>,
        copy_buffer_size: usize,
    ) -> Self {
        Self {
            resolver,
            gate,
            copy_buffer_size: copy_buffer_size.max(1),
        }
    }

    /// Build a facade with the configured policy gate
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(
            DirectoryResolver::from_config(config),
            Arc::new(PolicyPermissionGate::from_config(&config.permissions)),
            config.transfer.copy_buffer_size,
        )
    }

    pub fn resolver(&self) -> &DirectoryResolver {
        &self.resolver
    }

    /// Resolve a path for an operation that touches the filesystem
    fn resolve_checked(&self, path: &str, alias: DirectoryAlias) -> FileResult<PathBuf> {
        let resolved = self.resolver.resolve(path, alias)?;
        if alias.is_public() {
            self.ensure_public_access(&resolved)?;
        }
        Ok(resolved)
    }

    fn ensure_public_access(&self, path: &Path) -> FileResult<()> {
        match self.gate.current_state(PermissionScope::PublicStorage) {
            PermissionState::Granted => Ok(()),
            state => {
                warn!(
                    "Public storage access to {} refused (permission {})",
                    path.display(),
                    state
                );
                Err(FileError::PermissionDenied(format!(
                    "public storage permission is {}",
                    state
                )))
            }
        }
    }

    /// Open or create a file entry
    pub fn get_file(
        &self,
        path: &str,
        alias: DirectoryAlias,
        options: GetOptions,
    ) -> FileResult<EntryDescriptor> {
        let file_path = self.resolve_checked(path, alias)?;

        if file_path.exists() {
            if file_path.is_dir() {
                return Err(FileError::TypeMismatch(format!("{} is a directory", path)));
            }
            if options.create && options.exclusive {
                return Err(FileError::AlreadyExists(path.to_string()));
            }
            return Ok(describe(&file_path));
        }

        if !options.create {
            return Err(FileError::NotFound(path.to_string()));
        }

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file_path)?;

        info!("Created file {} (real: {})", path, file_path.display());
        Ok(describe(&file_path))
    }

    /// Open or create a directory entry
    pub fn get_directory(
        &self,
        path: &str,
        alias: DirectoryAlias,
        options: GetOptions,
    ) -> FileResult<EntryDescriptor> {
        let dir_path = self.resolve_checked(path, alias)?;

        if dir_path.exists() {
            if dir_path.is_file() {
                return Err(FileError::TypeMismatch(format!("{} is a file", path)));
            }
            if options.create && options.exclusive {
                return Err(FileError::AlreadyExists(path.to_string()));
            }
            return Ok(describe(&dir_path));
        }

        if !options.create {
            return Err(FileError::NotFound(path.to_string()));
        }

        fs::create_dir_all(&dir_path)
            .map_err(|e| FileError::MkdirFailed(format!("{}: {}", path, e)))?;

        info!("Created directory {} (real: {})", path, dir_path.display());
        Ok(describe(&dir_path))
    }

    /// Read a file as text (with an encoding) or base64
    pub fn read_file(
        &self,
        path: &str,
        alias: DirectoryAlias,
        options: ReadOptions,
    ) -> FileResult<ReadResult> {
        let file_path = self.resolve_checked(path, alias)?;

        if !file_path.exists() {
            return Err(FileError::NotFound(path.to_string()));
        }

        let bytes = read_range(&file_path, options.offset, options.length)?;
        let data = match options.encoding {
            Some(encoding) => encoding.decode(&bytes),
            None => to_base64(&bytes),
        };

        debug!("Read {} bytes from {}", bytes.len(), file_path.display());
        Ok(ReadResult { data })
    }

    /// Read a whole file as a `data:` URL
    pub fn read_as_data_url(&self, path: &str, alias: DirectoryAlias) -> FileResult<ReadResult> {
        let file_path = self.resolve_checked(path, alias)?;

        if !file_path.exists() {
            return Err(FileError::NotFound(path.to_string()));
        }

        let bytes = fs::read(&file_path)?;
        let data = format!(
            "data:{};base64,{}",
            mime_type(&file_path),
            to_base64(&bytes)
        );
        Ok(ReadResult { data })
    }

    /// Write a payload using the positional, append or overwrite strategy
    pub fn write_file(
        &self,
        path: &str,
        alias: DirectoryAlias,
        data: &str,
        options: WriteOptions,
    ) -> FileResult<UriResult> {
        let file_path = self.resolve_checked(path, alias)?;

        if options.recursive {
            if let Some(parent) = file_path.parent() {
                if !parent.exists() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let bytes = payload_bytes(data, options.encoding);
        let strategy = WriteStrategy::choose(&options, file_path.exists());

        match strategy {
            WriteStrategy::Positional(position) => {
                let mut file = OpenOptions::new().write(true).open(&file_path)?;
                file.seek(SeekFrom::Start(position))?;
                file.write_all(&bytes)?;
            }
            WriteStrategy::Append => {
                let mut file = OpenOptions::new().append(true).open(&file_path)?;
                file.write_all(&bytes)?;
            }
            WriteStrategy::Overwrite => {
                fs::write(&file_path, &bytes)?;
            }
        }

        info!(
            "Wrote {} bytes to {} (real: {}, {:?})",
            bytes.len(),
            path,
            file_path.display(),
            strategy
        );
        Ok(UriResult {
            uri: file_uri(&file_path),
        })
    }

    /// `write_file` with append forced on
    pub fn append_file(
        &self,
        path: &str,
        alias: DirectoryAlias,
        data: &str,
        options: WriteOptions,
    ) -> FileResult<UriResult> {
        let options = WriteOptions {
            append: true,
            ..options
        };
        self.write_file(path, alias, data, options)
    }

    /// Delete a file (or an empty directory)
    pub fn delete_file(&self, path: &str, alias: DirectoryAlias) -> FileResult<()> {
        let file_path = self.resolve_checked(path, alias)?;

        if !file_path.exists() {
            return Err(FileError::NotFound(path.to_string()));
        }

        remove_entry(&file_path).map_err(|e| {
            warn!("Failed to delete {} (real: {}): {}", path, file_path.display(), e);
            FileError::DeleteFailed(format!("{}: {}", path, e))
        })?;

        info!("Deleted {} (real: {})", path, file_path.display());
        Ok(())
    }

    /// Create a directory. Succeeds whenever the target exists afterwards.
    pub fn mkdir(&self, path: &str, alias: DirectoryAlias, recursive: bool) -> FileResult<()> {
        let dir_path = self.resolve_checked(path, alias)?;

        let attempt = if recursive {
            fs::create_dir_all(&dir_path)
        } else {
            fs::create_dir(&dir_path)
        };

        match attempt {
            Ok(()) => {
                info!("Created directory {} (real: {})", path, dir_path.display());
                Ok(())
            }
            Err(_) if dir_path.exists() => Ok(()),
            Err(e) => {
                warn!("Failed to create directory {}: {}", dir_path.display(), e);
                Err(FileError::MkdirFailed(format!("{}: {}", path, e)))
            }
        }
    }

    /// Remove a directory, optionally with its whole subtree
    pub fn rmdir(&self, path: &str, alias: DirectoryAlias, recursive: bool) -> FileResult<()> {
        let dir_path = self.resolve_checked(path, alias)?;

        if !dir_path.exists() {
            return Err(FileError::NotFound(path.to_string()));
        }

        if recursive {
            remove_recursively(&dir_path)
                .map_err(|e| FileError::DeleteFailed(format!("{}: {}", path, e)))?;
        } else {
            if dir_path.is_dir() && fs::read_dir(&dir_path)?.next().is_some() {
                return Err(FileError::NotEmpty(path.to_string()));
            }
            remove_entry(&dir_path)
                .map_err(|e| FileError::DeleteFailed(format!("{}: {}", path, e)))?;
        }

        info!(
            "Removed directory {} (real: {}, recursive: {})",
            path,
            dir_path.display(),
            recursive
        );
        Ok(())
    }

    /// List the immediate children of a directory
    pub fn readdir(&self, path: &str, alias: DirectoryAlias) -> FileResult<ReaddirResult> {
        let dir_path = self.resolve_checked(path, alias)?;

        if !dir_path.is_dir() {
            return Err(FileError::NotFound(path.to_string()));
        }

        let mut entries = fs::read_dir(&dir_path)?
            .map(|entry| entry.map(|entry| describe(&entry.path())))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        debug!("Listed {} - {} entries", dir_path.display(), entries.len());
        Ok(ReaddirResult { entries })
    }

    pub fn stat(&self, path: &str, alias: DirectoryAlias) -> FileResult<StatResult> {
        let entry_path = self.resolve_checked(path, alias)?;

        if !entry_path.exists() {
            return Err(FileError::NotFound(path.to_string()));
        }

        let metadata = fs::metadata(&entry_path)?;
        Ok(StatResult {
            entry_type: if metadata.is_dir() {
                EntryType::Directory
            } else {
                EntryType::File
            },
            size: metadata.len(),
            mtime: epoch_millis(metadata.modified()).unwrap_or(0),
            ctime: epoch_millis(metadata.created()),
            uri: file_uri(&entry_path),
        })
    }

    pub fn get_metadata(&self, path: &str, alias: DirectoryAlias) -> FileResult<MetadataResult> {
        let entry_path = self.resolve_checked(path, alias)?;

        if !entry_path.exists() {
            return Err(FileError::NotFound(path.to_string()));
        }

        let metadata = fs::metadata(&entry_path)?;
        Ok(MetadataResult {
            modification_time: epoch_millis(metadata.modified()).unwrap_or(0),
            size: metadata.len(),
        })
    }

    /// Rename or move an entry, silently replacing an existing destination.
    ///
    /// Falls back to a staged copy when the OS rename fails (e.g. across
    /// filesystems). The destination is only ever replaced by a complete copy,
    /// but an interruption before the source is removed leaves both present.
    pub fn rename(
        &self,
        from: &str,
        alias: DirectoryAlias,
        to: &str,
        to_alias: Option<DirectoryAlias>,
    ) -> FileResult<()> {
        let source = normalize_lexically(&self.resolve_checked(from, alias)?);
        let dest = normalize_lexically(&self.resolve_checked(to, to_alias.unwrap_or(alias))?);

        if !source.exists() {
            return Err(FileError::NotFound(from.to_string()));
        }

        if source == dest {
            return Ok(());
        }

        if source.starts_with(&dest) {
            return Err(FileError::RenameFailed(format!(
                "{} -> {}: destination contains the source",
                from, to
            )));
        }
        if dest.starts_with(&source) {
            return Err(FileError::RenameFailed(format!(
                "{} -> {}: cannot move a directory into itself",
                from, to
            )));
        }

        let rename_failed = |e: io::Error| FileError::RenameFailed(format!("{} -> {}: {}", from, to, e));

        if let Some(parent) = dest.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(rename_failed)?;
            }
        }

        if dest.exists() {
            remove_recursively(&dest).map_err(rename_failed)?;
        }

        match fs::rename(&source, &dest) {
            Ok(()) => {}
            Err(e) => {
                warn!(
                    "Rename {} -> {} failed ({}), falling back to staged copy",
                    source.display(),
                    dest.display(),
                    e
                );
                self.staged_move(&source, &dest).map_err(rename_failed)?;
            }
        }

        info!("Moved {} -> {}", source.display(), dest.display());
        Ok(())
    }

    /// Same contract as `rename`
    pub fn move_entry(
        &self,
        from: &str,
        alias: DirectoryAlias,
        to: &str,
        to_alias: Option<DirectoryAlias>,
    ) -> FileResult<()> {
        self.rename(from, alias, to, to_alias)
    }

    fn staged_move(&self, source: &Path, dest: &Path) -> io::Result<()> {
        let staging = staging_path(dest);

        if let Err(e) = self.copy_entry(source, &staging) {
            let _ = remove_recursively(&staging);
            return Err(e);
        }

        if let Err(e) = fs::rename(&staging, dest) {
            let _ = remove_recursively(&staging);
            return Err(e);
        }

        remove_recursively(source)
    }

    /// Copy a file or a whole directory tree
    pub fn copy(
        &self,
        from: &str,
        alias: DirectoryAlias,
        to: &str,
        to_alias: Option<DirectoryAlias>,
    ) -> FileResult<UriResult> {
        let source = normalize_lexically(&self.resolve_checked(from, alias)?);
        let dest = normalize_lexically(&self.resolve_checked(to, to_alias.unwrap_or(alias))?);

        if !source.exists() {
            return Err(FileError::NotFound(from.to_string()));
        }

        let copy_failed = |e: io::Error| FileError::CopyFailed(format!("{} -> {}: {}", from, to, e));

        if source.starts_with(&dest) && source != dest {
            return Err(copy_failed(io::Error::other("destination contains the source")));
        }

        if let Some(parent) = dest.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(copy_failed)?;
            }
        }

        self.copy_entry(&source, &dest).map_err(|e| {
            warn!("Copy {} -> {} failed: {}", source.display(), dest.display(), e);
            copy_failed(e)
        })?;

        info!("Copied {} -> {}", source.display(), dest.display());
        Ok(UriResult {
            uri: file_uri(&dest),
        })
    }

    fn copy_entry(&self, source: &Path, dest: &Path) -> io::Result<()> {
        if source == dest {
            return Err(io::Error::other("source and destination are the same"));
        }

        if source.is_dir() {
            if dest.starts_with(source) {
                return Err(io::Error::other("cannot copy a directory into itself"));
            }
            self.copy_directory(source, dest)
        } else {
            self.copy_file(source, dest)
        }
    }

    fn copy_directory(&self, source: &Path, dest: &Path) -> io::Result<()> {
        fs::create_dir_all(dest)?;

        for entry in fs::read_dir(source)? {
            let entry = entry?;
            let target = dest.join(entry.file_name());
            if entry.file_type()?.is_dir() {
                self.copy_directory(&entry.path(), &target)?;
            } else {
                self.copy_file(&entry.path(), &target)?;
            }
        }

        Ok(())
    }

    fn copy_file(&self, source: &Path, dest: &Path) -> io::Result<()> {
        let mut reader = BufReader::with_capacity(self.copy_buffer_size, File::open(source)?);
        let mut writer = File::create(dest)?;
        let mut buffer = vec![0; self.copy_buffer_size];

        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buffer[..n])?;
        }

        writer.flush()
    }

    /// Report existence. Never fails for a resolvable path.
    pub fn exists(&self, path: &str, alias: DirectoryAlias) -> FileResult<ExistsResult> {
        let entry_path = self.resolve_checked(path, alias)?;

        let entry_type = fs::metadata(&entry_path).ok().map(|metadata| {
            if metadata.is_dir() {
                EntryType::Directory
            } else {
                EntryType::File
            }
        });

        Ok(ExistsResult {
            exists: entry_type.is_some(),
            entry_type,
        })
    }

    /// Locator for a path, without touching the filesystem
    pub fn get_uri(&self, path: &str, alias: DirectoryAlias) -> FileResult<UriResult> {
        let entry_path = self.resolver.resolve(path, alias)?;
        Ok(UriResult {
            uri: file_uri(&entry_path),
        })
    }

    /// Set a file's length, zero-padding growth
    pub fn truncate(&self, path: &str, alias: DirectoryAlias, size: u64) -> FileResult<()> {
        let file_path = self.resolve_checked(path, alias)?;

        if !file_path.exists() {
            return Err(FileError::NotFound(path.to_string()));
        }

        let file = OpenOptions::new().write(true).open(&file_path)?;
        file.set_len(size)?;

        info!("Truncated {} to {} bytes", file_path.display(), size);
        Ok(())
    }

    /// Available bytes on the volume backing the private data root
    pub fn free_disk_space(&self) -> FreeSpaceResult {
        let free = self
            .resolver
            .base_dir(DirectoryAlias::Data)
            .and_then(|root| root.ancestors().find(|p| p.exists()))
            .map(|root| {
                fs2::available_space(root).unwrap_or_else(|e| {
                    warn!("Failed to query free space for {}: {}", root.display(), e);
                    0
                })
            })
            .unwrap_or(0);

        FreeSpaceResult { free }
    }

    /// Root descriptor of the temporary or persistent file system
    pub fn request_file_system(&self, fs_type: FileSystemType) -> FileResult<FileSystemInfo> {
        let alias = fs_type.root_alias();
        let root = self.resolver.base_dir(alias).ok_or_else(|| {
            FileError::InvalidPath(format!("no base directory for alias {}", alias))
        })?;

        if !root.exists() {
            fs::create_dir_all(root)?;
        }

        Ok(FileSystemInfo {
            name: fs_type.name().to_string(),
            root: describe(root),
        })
    }

    /// Describe the entry a `file://` URL points at
    pub fn resolve_local_url(&self, url: &str) -> FileResult<EntryDescriptor> {
        let entry_path = self.resolver.resolve_url(url)?;

        let public = self
            .resolver
            .base_dir(DirectoryAlias::External)
            .is_some_and(|base| entry_path.starts_with(base));
        if public {
            self.ensure_public_access(&entry_path)?;
        }

        if !entry_path.exists() {
            return Err(FileError::NotFound(url.to_string()));
        }

        Ok(describe(&entry_path))
    }

    /// Locators of every configured base directory
    pub fn directories(&self) -> DirectoriesResult {
        let uri_of = |alias| self.resolver.base_dir(alias).map(file_uri);

        if let Some(documents) = self.resolver.base_dir(DirectoryAlias::Documents) {
            if let Err(e) = fs::create_dir_all(documents) {
                warn!("Failed to create documents directory {}: {}", documents.display(), e);
            }
        }

        DirectoriesResult {
            application_directory: uri_of(DirectoryAlias::Application),
            application_storage_directory: self
                .resolver
                .base_dir(DirectoryAlias::Data)
                .and_then(Path::parent)
                .map(file_uri),
            data_directory: uri_of(DirectoryAlias::Data),
            cache_directory: uri_of(DirectoryAlias::Cache),
            temp_directory: uri_of(DirectoryAlias::Cache),
            external_root_directory: uri_of(DirectoryAlias::External),
            external_data_directory: uri_of(DirectoryAlias::ExternalStorage),
            documents_directory: uri_of(DirectoryAlias::Documents),
            library_directory: uri_of(DirectoryAlias::Library),
        }
    }

    pub fn plugin_version(&self) -> VersionResult {
        VersionResult {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn check_permissions(&self) -> PermissionStatus {
        PermissionStatus {
            public_storage: self.gate.current_state(PermissionScope::PublicStorage),
        }
    }

    /// Ask the gate for public storage access; may wait on the user
    pub async fn request_permissions(&self) -> PermissionStatus {
        PermissionStatus {
            public_storage: self.gate.request(PermissionScope::PublicStorage).await,
        }
    }
}

/// Read up to `length` bytes starting at `offset`; an offset past the end
/// yields no bytes
fn read_range(path: &Path, offset: i64, length: Option<i64>) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();
    let start = offset.max(0) as u64;

    if start >= file_size {
        return Ok(Vec::new());
    }

    let remaining = file_size - start;
    let to_read = match length {
        Some(length) => (length.max(0) as u64).min(remaining),
        None => remaining,
    };

    file.seek(SeekFrom::Start(start))?;
    let mut bytes = Vec::with_capacity(to_read as usize);
    file.take(to_read).read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Remove a file or an empty directory
fn remove_entry(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Depth-first removal, children before parent. Stops at the first failure.
fn remove_recursively(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        for entry in fs::read_dir(path)? {
            remove_recursively(&entry?.path())?;
        }
    }
    remove_entry(path)
}

/// Hidden sibling of the destination used by the rename fallback
fn staging_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.{}.staging", name, process::id()))
}

fn epoch_millis(time: io::Result<SystemTime>) -> Option<u64> {
    time.ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_takes_precedence_over_append() {
        let options = WriteOptions {
            append: true,
            position: Some(5),
            ..Default::default()
        };
        assert_eq!(WriteStrategy::choose(&options, true), WriteStrategy::Positional(5));
        assert_eq!(WriteStrategy::choose(&options, false), WriteStrategy::Overwrite);
    }

    #[test]
    fn append_requires_existing_target() {
        let options = WriteOptions {
            append: true,
            ..Default::default()
        };
        assert_eq!(WriteStrategy::choose(&options, true), WriteStrategy::Append);
        assert_eq!(WriteStrategy::choose(&options, false), WriteStrategy::Overwrite);
    }

    #[test]
    fn negative_position_clamps_to_start() {
        let options = WriteOptions {
            position: Some(-3),
            ..Default::default()
        };
        assert_eq!(WriteStrategy::choose(&options, true), WriteStrategy::Positional(0));
    }

    #[test]
    fn read_range_clamps_offsets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digits.txt");
        fs::write(&path, b"0123456789").unwrap();

        assert_eq!(read_range(&path, -4, Some(3)).unwrap(), b"012");
        assert_eq!(read_range(&path, 7, None).unwrap(), b"789");
        assert_eq!(read_range(&path, 8, Some(100)).unwrap(), b"89");
        assert!(read_range(&path, 10, None).unwrap().is_empty());
        assert!(read_range(&path, 2, Some(-1)).unwrap().is_empty());
    }

    #[test]
    fn staging_path_is_hidden_sibling() {
        let staging = staging_path(Path::new("/data/out/report.pdf"));
        assert_eq!(staging.parent(), Some(Path::new("/data/out")));
        let name = staging.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".report.pdf."));
        assert!(name.ends_with(".staging"));
    }

    fn storage_under(root: &Path) -> FileStorage {
        FileStorage::from_config(&BridgeConfig::with_root(root))
    }

    fn staging_leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".staging"))
            .collect()
    }

    #[test]
    fn staged_move_replaces_file_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_under(dir.path());
        let source = dir.path().join("in.txt");
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        fs::write(&source, b"payload").unwrap();
        fs::write(out.join("in.txt"), b"stale contents").unwrap();

        storage.staged_move(&source, &out.join("in.txt")).unwrap();

        assert_eq!(fs::read(out.join("in.txt")).unwrap(), b"payload");
        assert!(!source.exists());
        assert!(staging_leftovers(&out).is_empty());
    }

    #[test]
    fn staged_move_carries_directory_tree() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_under(dir.path());
        let source = dir.path().join("tree");
        fs::create_dir_all(source.join("nested/deeper")).unwrap();
        fs::write(source.join("top.txt"), b"top").unwrap();
        fs::write(source.join("nested/deeper/leaf.bin"), vec![7u8; 20_000]).unwrap();
        let dest = dir.path().join("moved");

        storage.staged_move(&source, &dest).unwrap();

        assert_eq!(fs::read(dest.join("top.txt")).unwrap(), b"top");
        assert_eq!(
            fs::read(dest.join("nested/deeper/leaf.bin")).unwrap(),
            vec![7u8; 20_000]
        );
        assert!(!source.exists());
        assert!(staging_leftovers(dir.path()).is_empty());
    }

    #[test]
    fn failed_staged_move_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_under(dir.path());
        let source = dir.path().join("keep.txt");
        fs::write(&source, b"keep").unwrap();
        let dest = dir.path().join("missing-parent/keep.txt");

        assert!(storage.staged_move(&source, &dest).is_err());
        assert_eq!(fs::read(&source).unwrap(), b"keep");
        assert!(staging_leftovers(dir.path()).is_empty());
    }
}
