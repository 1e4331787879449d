//! Configuration for loading definition directories
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schemas.toml)
//! - Environment variables (SCHEMAS__*)
//!
//! ## Example config file (schemas.toml):
//! ```toml
//! [directories]
//! root = "./definitions"
//! enums = "enums"
//! models = "models"
//! entities = "entities"
//! structures = "structures"
//!
//! [loader]
//! recursive = false
//! follow_links = false
//!
//! [validation]
//! validate_on_load = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::loader::YamlSource;
use crate::schema::DefinitionKind;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Where each kind of definition lives
    #[serde(default)]
    pub directories: DirectoryConfig,

    /// Directory scanning behaviour
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// One directory per definition kind, relative to `root` unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_enums_dir")]
    pub enums: PathBuf,

    #[serde(default = "default_models_dir")]
    pub models: PathBuf,

    #[serde(default = "default_entities_dir")]
    pub entities: PathBuf,

    #[serde(default = "default_structures_dir")]
    pub structures: PathBuf,
}

/// Loader configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Descend into subdirectories of each kind's directory
    #[serde(default)]
    pub recursive: bool,

    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_links: bool,
}

/// Validation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Run each kind's validator before committing a loaded batch
    #[serde(default = "default_true")]
    pub validate_on_load: bool,
}

// Default value functions
fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_enums_dir() -> PathBuf {
    PathBuf::from("enums")
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_entities_dir() -> PathBuf {
    PathBuf::from("entities")
}

fn default_structures_dir() -> PathBuf {
    PathBuf::from("structures")
}

fn default_true() -> bool {
    true
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            enums: default_enums_dir(),
            models: default_models_dir(),
            entities: default_entities_dir(),
            structures: default_structures_dir(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_on_load: true,
        }
    }
}

impl DirectoryConfig {
    /// All directories under a single root, using the default layout
    pub fn under(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Directory holding definitions of `kind`
    pub fn path_for(&self, kind: DefinitionKind) -> PathBuf {
        let dir: &Path = match kind {
            DefinitionKind::Enum => &self.enums,
            DefinitionKind::Model => &self.models,
            DefinitionKind::Entity => &self.entities,
            DefinitionKind::Structure => &self.structures,
        };
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        }
    }
}

impl LoaderConfig {
    /// The filesystem source described by this configuration
    pub fn source(&self) -> YamlSource {
        YamlSource::new()
            .recursive(self.recursive)
            .follow_links(self.follow_links)
    }
}

impl SchemaConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["schemas.toml", ".schemas.toml", "config/schemas.toml"];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "schemas", "schemas-core") {
            let xdg_config = config_dir.config_dir().join("schemas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // SCHEMAS__DIRECTORIES__ROOT=... and friends
        builder = builder.add_source(
            Environment::with_prefix("SCHEMAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Root directory with relative paths resolved against the working directory
    pub fn root_path(&self) -> PathBuf {
        let root = &self.directories.root;
        if root.is_absolute() {
            root.clone()
        } else {
            std::env::current_dir().unwrap_or_default().join(root)
        }
    }
}
