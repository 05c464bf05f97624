//! Configuration management for the scoped filesystem bridge
//!
//! Base directories for every alias are supplied explicitly instead of being
//! looked up from the platform, so a bridge can be pointed at any sandbox.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::storage::permissions::PermissionState;

/// Complete bridge configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BridgeConfig {
    #[serde(default)]
    pub directories: DirectoryConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub transfer: TransferConfig,

    #[serde(default)]
    pub permissions: PermissionConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Base directory for each alias. An alias left unset cannot be resolved.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DirectoryConfig {
    /// Private data root, also used for unknown aliases
    pub data: Option<String>,
    pub documents: Option<String>,
    pub library: Option<String>,
    pub cache: Option<String>,
    /// Public shared storage root (gated by the permission gate)
    pub external: Option<String>,
    /// App-specific directory on external storage
    pub external_storage: Option<String>,
    /// Application bundle directory
    pub application: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathConfig {
    /// Reject relative paths that climb above their alias base
    pub confine_to_root: bool,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            confine_to_root: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TransferConfig {
    /// Chunk size for streamed copies
    pub copy_buffer_size: usize,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            copy_buffer_size: 8192,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PermissionConfig {
    /// Initial public storage permission state
    pub public_storage: PermissionState,

    /// Whether a permission request grants access
    pub grant_on_request: bool,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            public_storage: PermissionState::Granted,
            grant_on_request: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Longest request line accepted by the stdio transport
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_request_bytes: 16 * 1024 * 1024,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from a TOML file with environment overrides
    pub fn load(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(Environment::with_prefix("SCOPED_FS").separator("__"))
            .build()?;

        let config: BridgeConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Derive a full sandbox layout under a single directory
    pub fn with_root(root: &Path) -> Self {
        let under = |rel: &str| Some(root.join(rel).to_string_lossy().to_string());

        Self {
            directories: DirectoryConfig {
                data: under("files"),
                documents: under("files/Documents"),
                library: under("files"),
                cache: under("cache"),
                external: under("external"),
                external_storage: under("external/Android/data"),
                application: under("app"),
            },
            paths: PathConfig::default(),
            transfer: TransferConfig::default(),
            permissions: PermissionConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        match &self.directories.data {
            Some(data) if !data.is_empty() => {}
            _ => {
                return Err(config::ConfigError::Message(
                    "directories.data must be set".into(),
                ));
            }
        }

        if self.transfer.copy_buffer_size == 0 {
            return Err(config::ConfigError::Message(
                "copy_buffer_size must be greater than 0".into(),
            ));
        }

        if self.server.max_request_bytes == 0 {
            return Err(config::ConfigError::Message(
                "max_request_bytes must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl DirectoryConfig {
    /// Get the private data root as PathBuf
    pub fn data_root(&self) -> Option<PathBuf> {
        self.data.as_ref().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_root_lays_out_every_alias() {
        let config = BridgeConfig::with_root(Path::new("/sandbox"));
        assert_eq!(config.directories.data.as_deref(), Some("/sandbox/files"));
        assert_eq!(config.directories.cache.as_deref(), Some("/sandbox/cache"));
        assert!(config.directories.application.is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_data_root() {
        let mut config = BridgeConfig::with_root(Path::new("/sandbox"));
        config.directories.data = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_buffer() {
        let mut config = BridgeConfig::with_root(Path::new("/sandbox"));
        config.transfer.copy_buffer_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.toml");
        std::fs::write(
            &path,
            "[directories]\ndata = \"/tmp/data\"\ncache = \"/tmp/cache\"\n\n[paths]\nconfine_to_root = false\n",
        )
        .unwrap();

        let config = BridgeConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.directories.data.as_deref(), Some("/tmp/data"));
        assert!(config.directories.documents.is_none());
        assert!(!config.paths.confine_to_root);
        assert_eq!(config.transfer.copy_buffer_size, 8192);
    }
}
