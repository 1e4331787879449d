//! Definition registry
//!
//! Holds the four namespaces (enums, models, entities, structures) behind a
//! single reader/writer lock. Batches arrive through a [`DefinitionSource`];
//! each batch is normalized, conflict-checked, optionally validated against
//! the registry plus the batch itself, and then committed in one step. A
//! failed batch leaves the registry untouched.
//!
//! Every accessor hands out owned copies, so nothing a caller does to a
//! returned value is visible to other readers.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{DirectoryConfig, SchemaConfig};
use crate::error::{Result, SchemaError};
use crate::loader::{DefinitionSource, ScanError, YamlSource};
use crate::normalize::normalize_all;
use crate::schema::{Definition, DefinitionKind, Entity, Enum, Model, Namespace, Structure};

#[derive(Debug, Clone, Default)]
struct Namespaces {
    enums: Namespace<Enum>,
    models: Namespace<Model>,
    entities: Namespace<Entity>,
    structures: Namespace<Structure>,
}

/// Ties a definition kind to its namespace and validator
trait Stored: Definition {
    fn namespace(state: &Namespaces) -> &Namespace<Self>;
    fn namespace_mut(state: &mut Namespaces) -> &mut Namespace<Self>;
    fn validate_in(&self, state: &Namespaces) -> Result<()>;
}

impl Stored for Enum {
    fn namespace(state: &Namespaces) -> &Namespace<Self> {
        &state.enums
    }

    fn namespace_mut(state: &mut Namespaces) -> &mut Namespace<Self> {
        &mut state.enums
    }

    fn validate_in(&self, _state: &Namespaces) -> Result<()> {
        self.validate()
    }
}

impl Stored for Structure {
    fn namespace(state: &Namespaces) -> &Namespace<Self> {
        &state.structures
    }

    fn namespace_mut(state: &mut Namespaces) -> &mut Namespace<Self> {
        &mut state.structures
    }

    fn validate_in(&self, _state: &Namespaces) -> Result<()> {
        self.validate()
    }
}

impl Stored for Model {
    fn namespace(state: &Namespaces) -> &Namespace<Self> {
        &state.models
    }

    fn namespace_mut(state: &mut Namespaces) -> &mut Namespace<Self> {
        &mut state.models
    }

    fn validate_in(&self, state: &Namespaces) -> Result<()> {
        self.validate_with_peers(&state.models, &state.enums)
    }
}

impl Stored for Entity {
    fn namespace(state: &Namespaces) -> &Namespace<Self> {
        &state.entities
    }

    fn namespace_mut(state: &mut Namespaces) -> &mut Namespace<Self> {
        &mut state.entities
    }

    fn validate_in(&self, state: &Namespaces) -> Result<()> {
        self.validate(&state.entities, &state.models, &state.enums)
    }
}

/// Definition counts per namespace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub enums: usize,
    pub models: usize,
    pub entities: usize,
    pub structures: usize,
}

impl RegistrySummary {
    /// Definitions across all namespaces
    pub fn total(&self) -> usize {
        self.enums + self.models + self.entities + self.structures
    }
}

impl fmt::Display for RegistrySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} enums, {} structures, {} models, {} entities",
            self.enums, self.structures, self.models, self.entities
        )
    }
}

/// Concurrency-safe store of validated definitions
#[derive(Debug)]
pub struct Registry<S = YamlSource> {
    source: S,
    validate_on_load: bool,
    state: RwLock<Namespaces>,
}

impl Registry<YamlSource> {
    /// Empty registry reading YAML files from disk
    pub fn new() -> Self {
        Self::with_source(YamlSource::default())
    }

    /// Empty registry configured from `[loader]` and `[validation]`
    pub fn from_config(config: &SchemaConfig) -> Self {
        Self::with_source(config.loader.source())
            .with_validation(config.validation.validate_on_load)
    }
}

impl Default for Registry<YamlSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DefinitionSource> Registry<S> {
    /// Empty registry reading through `source`, validating on load
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            validate_on_load: true,
            state: RwLock::new(Namespaces::default()),
        }
    }

    /// Toggle validation of loaded batches before commit
    pub fn with_validation(mut self, validate_on_load: bool) -> Self {
        self.validate_on_load = validate_on_load;
        self
    }

    // Writers never leave partial state behind, so a poisoned lock is safe to reuse.
    fn read(&self) -> RwLockReadGuard<'_, Namespaces> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Namespaces> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn set<T: Stored>(&self, name: impl Into<String>, definition: T) {
        T::namespace_mut(&mut self.write()).insert(name.into(), definition);
    }

    fn get<T: Stored>(&self, name: &str) -> Result<T> {
        T::namespace(&self.read())
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::NotFound {
                kind: T::KIND,
                name: name.to_string(),
            })
    }

    fn all<T: Stored>(&self) -> Namespace<T> {
        T::namespace(&self.read()).clone()
    }

    fn has<T: Stored>(&self) -> bool {
        !T::namespace(&self.read()).is_empty()
    }

    /// Scan, normalize and commit one batch; returns how many were added
    fn load<T: Stored>(&self, dir: &Path) -> Result<usize> {
        let kind = T::KIND;
        let mut batch = match self.source.scan::<T>(dir, kind.suffix()) {
            Ok(batch) => batch,
            Err(ScanError::NotFound(path)) => {
                warn!(%kind, dir = %path.display(), "directory does not exist, skipping");
                return Ok(0);
            }
            Err(source) => return Err(SchemaError::Source { kind, source }),
        };

        if batch.is_empty() {
            warn!(%kind, dir = %dir.display(), "no definition files found, skipping");
            return Ok(0);
        }
        normalize_all(batch.values_mut());

        let mut state = self.write();
        if kind == DefinitionKind::Entity && state.models.is_empty() {
            return Err(SchemaError::EntitiesWithoutModels);
        }

        let mut candidate = state.clone();
        let mut loaded = Vec::with_capacity(batch.len());
        for (path, definition) in batch {
            let name = definition.name().to_string();
            let namespace = T::namespace_mut(&mut candidate);
            if namespace.contains_key(&name) {
                return Err(SchemaError::NameConflict { kind, name, path });
            }
            debug!(%kind, %name, path = %path.display(), "staged definition");
            namespace.insert(name.clone(), definition);
            loaded.push(name);
        }

        if self.validate_on_load {
            let staged = T::namespace(&candidate);
            for name in &loaded {
                if let Some(definition) = staged.get(name) {
                    definition.validate_in(&candidate)?;
                }
            }
        }

        *state = candidate;
        info!(%kind, count = loaded.len(), dir = %dir.display(), "loaded definitions");
        Ok(loaded.len())
    }

    /// Insert or replace an enum
    pub fn set_enum(&self, name: impl Into<String>, definition: Enum) {
        self.set(name, definition);
    }

    /// Copy of the enum named `name`
    pub fn get_enum(&self, name: &str) -> Result<Enum> {
        self.get(name)
    }

    /// Copy of every enum
    pub fn all_enums(&self) -> Namespace<Enum> {
        self.all()
    }

    /// Whether any enum is registered
    pub fn has_enums(&self) -> bool {
        self.has::<Enum>()
    }

    /// Load every `.enum` file in `dir`
    pub fn load_enums_from_directory(&self, dir: impl AsRef<Path>) -> Result<usize> {
        self.load::<Enum>(dir.as_ref())
    }

    /// Insert or replace a model
    pub fn set_model(&self, name: impl Into<String>, definition: Model) {
        self.set(name, definition);
    }

    /// Copy of the model named `name`
    pub fn get_model(&self, name: &str) -> Result<Model> {
        self.get(name)
    }

    /// Copy of every model
    pub fn all_models(&self) -> Namespace<Model> {
        self.all()
    }

    /// Whether any model is registered
    pub fn has_models(&self) -> bool {
        self.has::<Model>()
    }

    /// Load every `.mod` file in `dir`
    pub fn load_models_from_directory(&self, dir: impl AsRef<Path>) -> Result<usize> {
        self.load::<Model>(dir.as_ref())
    }

    /// Insert or replace an entity
    pub fn set_entity(&self, name: impl Into<String>, definition: Entity) {
        self.set(name, definition);
    }

    /// Copy of the entity named `name`
    pub fn get_entity(&self, name: &str) -> Result<Entity> {
        self.get(name)
    }

    /// Copy of every entity
    pub fn all_entities(&self) -> Namespace<Entity> {
        self.all()
    }

    /// Whether any entity is registered
    pub fn has_entities(&self) -> bool {
        self.has::<Entity>()
    }

    /// Fails with [`SchemaError::EntitiesWithoutModels`] while no model is registered
    pub fn load_entities_from_directory(&self, dir: impl AsRef<Path>) -> Result<usize> {
        self.load::<Entity>(dir.as_ref())
    }

    /// Insert or replace a structure
    pub fn set_structure(&self, name: impl Into<String>, definition: Structure) {
        self.set(name, definition);
    }

    /// Copy of the structure named `name`
    pub fn get_structure(&self, name: &str) -> Result<Structure> {
        self.get(name)
    }

    /// Copy of every structure
    pub fn all_structures(&self) -> Namespace<Structure> {
        self.all()
    }

    /// Whether any structure is registered
    pub fn has_structures(&self) -> bool {
        self.has::<Structure>()
    }

    /// Load every `.str` file in `dir`
    pub fn load_structures_from_directory(&self, dir: impl AsRef<Path>) -> Result<usize> {
        self.load::<Structure>(dir.as_ref())
    }

    /// Load every kind in dependency order: enums, structures, models, entities
    pub fn load_all(&self, directories: &DirectoryConfig) -> Result<RegistrySummary> {
        self.load_enums_from_directory(directories.path_for(DefinitionKind::Enum))?;
        self.load_structures_from_directory(directories.path_for(DefinitionKind::Structure))?;
        self.load_models_from_directory(directories.path_for(DefinitionKind::Model))?;
        self.load_entities_from_directory(directories.path_for(DefinitionKind::Entity))?;
        Ok(self.summary())
    }

    /// Entities require at least one model
    pub fn validate(&self) -> Result<()> {
        let state = self.read();
        if !state.entities.is_empty() && state.models.is_empty() {
            return Err(SchemaError::InvalidRegistryState);
        }
        Ok(())
    }

    /// Run every definition's validator over one consistent snapshot
    pub fn validate_definitions(&self) -> Result<()> {
        let state = self.read();
        if !state.entities.is_empty() && state.models.is_empty() {
            return Err(SchemaError::InvalidRegistryState);
        }
        for definition in state.enums.values() {
            definition.validate_in(&state)?;
        }
        for definition in state.structures.values() {
            definition.validate_in(&state)?;
        }
        for definition in state.models.values() {
            definition.validate_in(&state)?;
        }
        for definition in state.entities.values() {
            definition.validate_in(&state)?;
        }
        Ok(())
    }

    /// Current definition counts
    pub fn summary(&self) -> RegistrySummary {
        let state = self.read();
        RegistrySummary {
            enums: state.enums.len(),
            models: state.models.len(),
            entities: state.entities.len(),
            structures: state.structures.len(),
        }
    }
}

impl<S: DefinitionSource + Clone> Registry<S> {
    /// Fully independent copy of the registry and its contents
    pub fn deep_clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            validate_on_load: self.validate_on_load,
            state: RwLock::new(self.read().clone()),
        }
    }
}

impl<S: DefinitionSource + Clone> Clone for Registry<S> {
    fn clone(&self) -> Self {
        self.deep_clone()
    }
}
