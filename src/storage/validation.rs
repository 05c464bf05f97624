//! Path resolution and validation
//!
//! Maps a (directory alias, relative path) pair onto an absolute platform path.

use log::{debug, warn};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use url::Url;

use crate::config::{BridgeConfig, DirectoryConfig};
use crate::error::{FileError, FileResult};
use crate::storage::directory::DirectoryAlias;

/// Resolves alias-relative paths against the configured base directories
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    data: Option<PathBuf>,
    documents: Option<PathBuf>,
    library: Option<PathBuf>,
    cache: Option<PathBuf>,
    external: Option<PathBuf>,
    external_storage: Option<PathBuf>,
    application: Option<PathBuf>,
    confine_to_root: bool,
}

impl DirectoryResolver {
    pub fn new(directories: &DirectoryConfig, confine_to_root: bool) -> Self {
        Self {
            data: absolute_base(&directories.data),
            documents: absolute_base(&directories.documents),
            library: absolute_base(&directories.library),
            cache: absolute_base(&directories.cache),
            external: absolute_base(&directories.external),
            external_storage: absolute_base(&directories.external_storage),
            application: absolute_base(&directories.application),
            confine_to_root,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(&config.directories, config.paths.confine_to_root)
    }

    /// Base directory for an alias, if the platform provides one
    pub fn base_dir(&self, alias: DirectoryAlias) -> Option<&Path> {
        let base = match alias {
            DirectoryAlias::Documents => &self.documents,
            DirectoryAlias::Data | DirectoryAlias::Default => &self.data,
            DirectoryAlias::Library => &self.library,
            DirectoryAlias::Cache => &self.cache,
            DirectoryAlias::External => &self.external,
            DirectoryAlias::ExternalStorage => &self.external_storage,
            DirectoryAlias::Application => &self.application,
        };
        base.as_deref()
    }

    /// Resolve a relative path against an alias.
    ///
    /// Exactly one leading `/` is stripped and the remainder is joined to the
    /// base verbatim. With confinement enabled, paths that would climb above
    /// the base are rejected.
    pub fn resolve(&self, relative_path: &str, alias: DirectoryAlias) -> FileResult<PathBuf> {
        let base = self.base_dir(alias).ok_or_else(|| {
            FileError::InvalidPath(format!("no base directory for alias {}", alias))
        })?;

        let cleaned = strip_leading_separator(relative_path);

        if self.confine_to_root && !is_confined(cleaned) {
            warn!(
                "Rejected path escaping {} root: {}",
                alias, relative_path
            );
            return Err(FileError::InvalidPath(relative_path.to_string()));
        }

        if cleaned.is_empty() {
            return Ok(base.to_path_buf());
        }

        let mut joined = OsString::from(base.as_os_str());
        joined.push(std::path::MAIN_SEPARATOR_STR);
        joined.push(cleaned);

        let resolved = PathBuf::from(joined);
        debug!("Resolved {}:{} -> {}", alias, relative_path, resolved.display());
        Ok(resolved)
    }

    /// Resolve a `file://` URL to a local path
    pub fn resolve_url(&self, url: &str) -> FileResult<PathBuf> {
        let parsed = Url::parse(url).map_err(|e| FileError::InvalidPath(format!("{}: {}", url, e)))?;

        if parsed.scheme() != "file" {
            return Err(FileError::InvalidPath(format!("unsupported scheme: {}", url)));
        }

        let path = parsed
            .to_file_path()
            .map_err(|_| FileError::InvalidPath(url.to_string()))?;

        if self.confine_to_root && !self.bases().iter().any(|(_, base)| path.starts_with(base)) {
            warn!("Rejected URL outside every configured root: {}", url);
            return Err(FileError::InvalidPath(url.to_string()));
        }

        Ok(path)
    }

    /// Every configured base directory with its alias
    pub fn bases(&self) -> Vec<(DirectoryAlias, &Path)> {
        [
            DirectoryAlias::Data,
            DirectoryAlias::Documents,
            DirectoryAlias::Library,
            DirectoryAlias::Cache,
            DirectoryAlias::External,
            DirectoryAlias::ExternalStorage,
            DirectoryAlias::Application,
        ]
        .into_iter()
        .filter_map(|alias| self.base_dir(alias).map(|base| (alias, base)))
        .collect()
    }
}

fn absolute_base(configured: &Option<String>) -> Option<PathBuf> {
    let raw = configured.as_deref().filter(|p| !p.is_empty())?;
    let path = Path::new(raw);
    Some(std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()))
}

/// Strip a single leading separator
pub fn strip_leading_separator(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` directly under a root is dropped; leading `..` of a relative path is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }

    normalized
}

/// Lexically check that a relative path never climbs above its base
pub fn is_confined(relative_path: &str) -> bool {
    let mut depth: usize = 0;

    for component in Path::new(relative_path).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => return false,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::Normal(_) => depth += 1,
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(confine: bool) -> DirectoryResolver {
        let mut config = BridgeConfig::with_root(Path::new("/sandbox"));
        config.paths.confine_to_root = confine;
        DirectoryResolver::from_config(&config)
    }

    #[test]
    fn leading_separator_is_stripped_once() {
        let r = resolver(true);
        for alias in [
            DirectoryAlias::Documents,
            DirectoryAlias::Cache,
            DirectoryAlias::Default,
            DirectoryAlias::ExternalStorage,
        ] {
            for path in ["notes.txt", "a/b/c.bin", ""] {
                assert_eq!(
                    r.resolve(path, alias).unwrap(),
                    r.resolve(&format!("/{}", path), alias).unwrap()
                );
            }
        }
    }

    #[test]
    fn aliases_map_to_their_bases() {
        let r = resolver(true);
        assert_eq!(
            r.resolve("a.txt", DirectoryAlias::Cache).unwrap(),
            PathBuf::from("/sandbox/cache/a.txt")
        );
        assert_eq!(
            r.resolve("a.txt", DirectoryAlias::Default).unwrap(),
            r.resolve("a.txt", DirectoryAlias::Data).unwrap()
        );
        assert_eq!(
            r.resolve("", DirectoryAlias::Documents).unwrap(),
            PathBuf::from("/sandbox/files/Documents")
        );
    }

    #[test]
    fn unconfigured_alias_is_invalid_path() {
        let mut config = BridgeConfig::with_root(Path::new("/sandbox"));
        config.directories.external = None;
        let r = DirectoryResolver::from_config(&config);
        assert!(matches!(
            r.resolve("photo.jpg", DirectoryAlias::External),
            Err(FileError::InvalidPath(_))
        ));
    }

    #[test]
    fn traversal_rejected_when_confined() {
        let r = resolver(true);
        assert!(matches!(
            r.resolve("../../etc/passwd", DirectoryAlias::Cache),
            Err(FileError::InvalidPath(_))
        ));
        assert!(matches!(
            r.resolve("//etc/passwd", DirectoryAlias::Cache),
            Err(FileError::InvalidPath(_))
        ));
        assert!(r.resolve("a/../b.txt", DirectoryAlias::Cache).is_ok());
    }

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(
            normalize_lexically(Path::new("/sandbox/files/d/../x.txt")),
            PathBuf::from("/sandbox/files/x.txt")
        );
        assert_eq!(
            normalize_lexically(Path::new("/sandbox/./files/a/b/../../c")),
            PathBuf::from("/sandbox/files/c")
        );
        assert_eq!(normalize_lexically(Path::new("/../etc")), PathBuf::from("/etc"));
        assert_eq!(normalize_lexically(Path::new("../a/..")), PathBuf::from(".."));
    }

    #[test]
    fn traversal_joined_verbatim_when_permissive() {
        let r = resolver(false);
        assert_eq!(
            r.resolve("../x", DirectoryAlias::Cache).unwrap(),
            PathBuf::from("/sandbox/cache/../x")
        );
    }

    #[test]
    fn file_urls_resolve_inside_roots() {
        let r = resolver(true);
        assert_eq!(
            r.resolve_url("file:///sandbox/cache/a.txt").unwrap(),
            PathBuf::from("/sandbox/cache/a.txt")
        );
        assert!(r.resolve_url("file:///etc/passwd").is_err());
        assert!(r.resolve_url("https://example.com/a.txt").is_err());
        assert!(r.resolve_url("not a url").is_err());
    }
}
