//! Schema definition types
//!
//! The four top-level kinds (enums, structures, models, entities) as
//! decoded from their definition files, together with the validators that
//! check each of them against its peers.

mod entity;
mod enumeration;
mod field;
mod model;
mod rules;
mod structure;

pub use entity::Entity;
pub use enumeration::{Enum, EnumKind, EnumValue};
pub use field::{is_primitive, EntityField, Field, FieldType, Identifier, Primitive};
pub use model::Model;
pub use structure::Structure;

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::normalize::Normalize;

/// Definitions of one kind, keyed by name
pub type Namespace<T> = BTreeMap<String, T>;

/// The four definition namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    Enum,
    Model,
    Entity,
    Structure,
}

impl DefinitionKind {
    /// Lowercase name used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enum => "enum",
            Self::Model => "model",
            Self::Entity => "entity",
            Self::Structure => "structure",
        }
    }

    /// File suffix of definition files of this kind
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Enum => ".enum",
            Self::Model => ".mod",
            Self::Entity => ".ent",
            Self::Structure => ".str",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named top-level definition stored in one registry namespace
pub trait Definition: Clone + fmt::Debug + DeserializeOwned + Normalize + Send + Sync {
    const KIND: DefinitionKind;

    fn name(&self) -> &str;
}

impl Definition for Enum {
    const KIND: DefinitionKind = DefinitionKind::Enum;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Definition for Model {
    const KIND: DefinitionKind = DefinitionKind::Model;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Definition for Entity {
    const KIND: DefinitionKind = DefinitionKind::Entity;

    fn name(&self) -> &str {
        &self.name
    }
}

impl Definition for Structure {
    const KIND: DefinitionKind = DefinitionKind::Structure;

    fn name(&self) -> &str {
        &self.name
    }
}
