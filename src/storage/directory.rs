//! Directory aliases
//!
//! Symbolic roots a caller addresses paths against.

use std::fmt;

/// Symbolic base directory for a relative path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DirectoryAlias {
    Documents,
    Data,
    Library,
    Cache,
    External,
    ExternalStorage,
    Application,
    #[default]
    Default,
}

impl DirectoryAlias {
    /// Parse an optional alias name. Absent or unknown names select `Default`.
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some("DOCUMENTS") => DirectoryAlias::Documents,
            Some("DATA") => DirectoryAlias::Data,
            Some("LIBRARY") => DirectoryAlias::Library,
            Some("CACHE") => DirectoryAlias::Cache,
            Some("EXTERNAL") => DirectoryAlias::External,
            Some("EXTERNAL_STORAGE") => DirectoryAlias::ExternalStorage,
            Some("APPLICATION") => DirectoryAlias::Application,
            _ => DirectoryAlias::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectoryAlias::Documents => "DOCUMENTS",
            DirectoryAlias::Data => "DATA",
            DirectoryAlias::Library => "LIBRARY",
            DirectoryAlias::Cache => "CACHE",
            DirectoryAlias::External => "EXTERNAL",
            DirectoryAlias::ExternalStorage => "EXTERNAL_STORAGE",
            DirectoryAlias::Application => "APPLICATION",
            DirectoryAlias::Default => "default",
        }
    }

    /// Whether the alias addresses public shared storage
    pub fn is_public(&self) -> bool {
        matches!(self, DirectoryAlias::External)
    }
}

impl fmt::Display for DirectoryAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of file system a caller requests a root for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSystemType {
    Temporary,
    Persistent,
}

impl FileSystemType {
    /// `0` selects the temporary file system, anything else the persistent one
    pub fn from_code(code: i64) -> Self {
        if code == 0 {
            FileSystemType::Temporary
        } else {
            FileSystemType::Persistent
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileSystemType::Temporary => "temporary",
            FileSystemType::Persistent => "persistent",
        }
    }

    /// Alias whose base directory roots this file system
    pub fn root_alias(&self) -> DirectoryAlias {
        match self {
            FileSystemType::Temporary => DirectoryAlias::Cache,
            FileSystemType::Persistent => DirectoryAlias::Data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_fall_back_to_default() {
        assert_eq!(DirectoryAlias::parse(None), DirectoryAlias::Default);
        assert_eq!(DirectoryAlias::parse(Some("SDCARD")), DirectoryAlias::Default);
        assert_eq!(DirectoryAlias::parse(Some("cache")), DirectoryAlias::Default);
    }

    #[test]
    fn known_names_round_trip_through_as_str() {
        for alias in [
            DirectoryAlias::Documents,
            DirectoryAlias::Data,
            DirectoryAlias::Library,
            DirectoryAlias::Cache,
            DirectoryAlias::External,
            DirectoryAlias::ExternalStorage,
            DirectoryAlias::Application,
        ] {
            assert_eq!(DirectoryAlias::parse(Some(alias.as_str())), alias);
        }
    }
}
