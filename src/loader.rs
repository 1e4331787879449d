//! Definition sources
//!
//! A [`DefinitionSource`] turns a directory into a map of file path to
//! decoded definition. The registry only talks to this trait; [`YamlSource`]
//! is the filesystem implementation used by default.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Errors raised while scanning a directory for definitions
#[derive(Error, Debug)]
pub enum ScanError {
    /// The directory does not exist; callers treat this as an empty batch
    #[error("directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Supplies decoded definitions for one directory and file suffix
pub trait DefinitionSource: Send + Sync {
    /// Decode every file in `dir` whose name ends with `suffix`.
    ///
    /// Keys are absolute paths. A missing `dir` must be reported as
    /// [`ScanError::NotFound`].
    fn scan<T: DeserializeOwned>(
        &self,
        dir: &Path,
        suffix: &str,
    ) -> Result<BTreeMap<PathBuf, T>, ScanError>;
}

/// Reads one YAML document per file from the local filesystem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlSource {
    /// Descend into subdirectories
    pub recursive: bool,
    pub follow_links: bool,
}

impl YamlSource {
    /// Non-recursive source that does not follow links
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether subdirectories are scanned
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Set whether symbolic links are followed
    pub fn follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    fn absolute(dir: &Path) -> Result<PathBuf, ScanError> {
        if dir.is_absolute() {
            return Ok(dir.to_path_buf());
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(dir))
            .map_err(|source| ScanError::Io {
                path: dir.to_path_buf(),
                source,
            })
    }
}

impl DefinitionSource for YamlSource {
    fn scan<T: DeserializeOwned>(
        &self,
        dir: &Path,
        suffix: &str,
    ) -> Result<BTreeMap<PathBuf, T>, ScanError> {
        let root = Self::absolute(dir)?;
        match fs::metadata(&root) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(ScanError::NotFound(root)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Err(ScanError::NotFound(root));
            }
            Err(source) => return Err(ScanError::Io { path: root, source }),
        }

        let mut walker = WalkDir::new(&root).min_depth(1).follow_links(self.follow_links);
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut definitions = BTreeMap::new();
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(suffix));
            if !matches {
                continue;
            }

            let path = entry.into_path();
            let content = fs::read_to_string(&path).map_err(|source| ScanError::Io {
                path: path.clone(),
                source,
            })?;
            let definition = serde_yaml::from_str(&content).map_err(|source| ScanError::Decode {
                path: path.clone(),
                source,
            })?;

            debug!(path = %path.display(), "decoded definition");
            definitions.insert(path, definition);
        }

        debug!(
            dir = %root.display(),
            suffix,
            count = definitions.len(),
            "scanned definition directory"
        );
        Ok(definitions)
    }
}
