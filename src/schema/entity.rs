//! Entity definitions and the entity validator
//!
//! Entities are read projections: each field names a dotted path through
//! the model graph instead of a type. Their own relations point at other
//! entities, so aliasing and polymorphic inverses are checked against the
//! entity namespace rather than the model one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rules::{self, Related};
use super::{DefinitionKind, EntityField, Enum, Identifier, Model, Namespace};
use crate::error::{Result, SchemaError};
use crate::path::{PathResolver, ResolvedField};
use crate::relation::Relation;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, EntityField>,
    #[serde(default)]
    pub identifiers: BTreeMap<String, Identifier>,
    #[serde(default)]
    pub related: BTreeMap<String, Relation>,
}

impl Related for Entity {
    fn relations(&self) -> &BTreeMap<String, Relation> {
        &self.related
    }
}

impl Entity {
    /// Create an empty entity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add or replace a field
    pub fn with_field(mut self, name: impl Into<String>, field: EntityField) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Add or replace an identifier
    pub fn with_identifier(mut self, name: impl Into<String>, identifier: Identifier) -> Self {
        self.identifiers.insert(name.into(), identifier);
        self
    }

    /// Add or replace a relation to another entity
    pub fn with_relation(mut self, name: impl Into<String>, relation: Relation) -> Self {
        self.related.insert(name.into(), relation);
        self
    }

    /// Validate against the full entity, model and enum sets.
    ///
    /// Stops at the first violation: structure, field paths, identifiers,
    /// then relations.
    pub fn validate(
        &self,
        all_entities: &Namespace<Entity>,
        all_models: &Namespace<Model>,
        all_enums: &Namespace<Enum>,
    ) -> Result<()> {
        self.validate_structure()?;
        self.resolve_fields(all_models, all_enums)?;
        rules::check_identifiers(DefinitionKind::Entity, &self.name, &self.identifiers, |field| {
            self.fields.contains_key(field)
        })?;
        rules::check_relations(DefinitionKind::Entity, &self.name, &self.related, all_entities)
    }

    fn validate_structure(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SchemaError::NoName {
                kind: DefinitionKind::Entity,
            });
        }
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields {
                kind: DefinitionKind::Entity,
                name: self.name.clone(),
            });
        }
        if self.identifiers.is_empty() {
            return Err(SchemaError::NoIdentifiers {
                kind: DefinitionKind::Entity,
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    /// Resolve every field path to its terminal model field
    pub fn resolve_fields(
        &self,
        all_models: &Namespace<Model>,
        all_enums: &Namespace<Enum>,
    ) -> Result<BTreeMap<String, ResolvedField>> {
        let resolver = PathResolver::new(all_models, all_enums);
        self.fields
            .iter()
            .map(|(field_name, field)| {
                resolver
                    .resolve_str(&field.path)
                    .map(|resolved| (field_name.clone(), resolved))
                    .map_err(|source| SchemaError::EntityField {
                        entity: self.name.clone(),
                        field: field_name.clone(),
                        source,
                    })
            })
            .collect()
    }
}
