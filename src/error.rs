//! Error types for schema validation and the definition registry

use std::path::PathBuf;

use thiserror::Error;

use crate::loader::ScanError;
use crate::path::PathError;
use crate::schema::DefinitionKind;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema validation and registry errors
#[derive(Error, Debug)]
pub enum SchemaError {
    // === Structural ===
    #[error("{kind} has no name")]
    NoName { kind: DefinitionKind },

    #[error("{kind} '{name}' has no fields")]
    NoFields { kind: DefinitionKind, name: String },

    #[error("{kind} '{name}' has no identifiers")]
    NoIdentifiers { kind: DefinitionKind, name: String },

    #[error("enum '{name}' has no entries")]
    NoEntries { name: String },

    // === Referential ===
    #[error("{kind} '{name}' field '{field}' has unknown non-primitive type '{field_type}'")]
    UnknownFieldType {
        kind: DefinitionKind,
        name: String,
        field: String,
        field_type: String,
    },

    #[error("{kind} '{name}' identifier '{identifier}' has no fields")]
    NoIdentifierFields {
        kind: DefinitionKind,
        name: String,
        identifier: String,
    },

    #[error("{kind} '{name}' identifier '{identifier}' references unknown field '{field}'")]
    UnknownIdentifierField {
        kind: DefinitionKind,
        name: String,
        identifier: String,
        field: String,
    },

    #[error("{kind} '{name}' relation '{relation}' has unknown aliased target: {aliased}")]
    UnknownAliasedTarget {
        kind: DefinitionKind,
        name: String,
        relation: String,
        aliased: String,
    },

    #[error("entity '{entity}' field '{field}': {source}")]
    EntityField {
        entity: String,
        field: String,
        #[source]
        source: PathError,
    },

    // === Enum values ===
    #[error("enum '{name}' has invalid type '{enum_type}'")]
    InvalidEnumType { name: String, enum_type: String },

    #[error("enum '{name}' entry '{entry}' does not hold a {expected} value")]
    EnumEntryTypeMismatch {
        name: String,
        entry: String,
        expected: String,
    },

    // === Relation shape ===
    #[error("{kind} '{name}' relation '{relation}' has no type")]
    NoRelationType {
        kind: DefinitionKind,
        name: String,
        relation: String,
    },

    #[error("{kind} '{name}' relation '{relation}' has invalid type '{relation_type}'")]
    InvalidRelationType {
        kind: DefinitionKind,
        name: String,
        relation: String,
        relation_type: String,
    },

    #[error("{kind} '{name}' polymorphic relation '{relation}' ({relation_type}) has no 'for' targets")]
    PolyRelationMissingFor {
        kind: DefinitionKind,
        name: String,
        relation: String,
        relation_type: String,
    },

    #[error("{kind} '{name}' polymorphic relation '{relation}' ({relation_type}) has no 'through' relation")]
    PolyRelationMissingThrough {
        kind: DefinitionKind,
        name: String,
        relation: String,
        relation_type: String,
    },

    // === Consistency ===
    #[error(
        "{kind} '{name}' polymorphic inverse relation '{relation}' (aliased: {aliased}, through: {through}): {}",
        .reason.describe(.kind, .name, .aliased, .through)
    )]
    PolymorphicInverse {
        kind: DefinitionKind,
        name: String,
        relation: String,
        aliased: String,
        through: String,
        reason: InverseMismatch,
    },

    // === Registry ===
    #[error("{kind} with name '{name}' not found in registry")]
    NotFound { kind: DefinitionKind, name: String },

    #[error("{kind} name '{name}' already exists in registry (conflict: {})", .path.display())]
    NameConflict {
        kind: DefinitionKind,
        name: String,
        path: PathBuf,
    },

    #[error("attempted to load entities but no models are defined in registry")]
    EntitiesWithoutModels,

    #[error("invalid registry state: entities exist but no models are defined")]
    InvalidRegistryState,

    #[error("failed to load {kind} definitions: {source}")]
    Source {
        kind: DefinitionKind,
        #[source]
        source: ScanError,
    },
}

/// Why a polymorphic `Has` relation does not match its inverse `For` relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InverseMismatch {
    /// The aliased peer has no relation named after `through`
    MissingThrough,
    /// The `through` relation exists but is not a polymorphic `For`
    NotForPoly { relation_type: String },
    /// The declaring definition is absent from the `through` relation's `for` list
    NotInForList,
}

impl InverseMismatch {
    fn describe(&self, kind: &DefinitionKind, name: &str, aliased: &str, through: &str) -> String {
        match self {
            Self::MissingThrough => {
                format!("aliased {kind} '{aliased}' does not have relationship '{through}'")
            }
            Self::NotForPoly { relation_type } => format!(
                "relationship '{through}' in {kind} '{aliased}' is not a polymorphic 'For' relationship (type: {relation_type})"
            ),
            Self::NotInForList => format!(
                "{kind} '{name}' is not in the 'for' list of polymorphic relationship '{through}' in {kind} '{aliased}'"
            ),
        }
    }
}

impl SchemaError {
    pub(crate) fn polymorphic_inverse(
        kind: DefinitionKind,
        name: &str,
        relation: &str,
        aliased: &str,
        through: &str,
        reason: InverseMismatch,
    ) -> Self {
        Self::PolymorphicInverse {
            kind,
            name: name.to_string(),
            relation: relation.to_string(),
            aliased: aliased.to_string(),
            through: through.to_string(),
            reason,
        }
    }
}
