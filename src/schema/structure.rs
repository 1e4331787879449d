//! Standalone value shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{is_primitive, DefinitionKind, Field};
use crate::error::{Result, SchemaError};

/// A named field shape outside the relation graph; fields are primitives only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Field>,
}

impl Structure {
    /// Create an empty structure
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add or replace a field
    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Check name, fields and that every field type is a primitive
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SchemaError::NoName {
                kind: DefinitionKind::Structure,
            });
        }
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields {
                kind: DefinitionKind::Structure,
                name: self.name.clone(),
            });
        }

        match self
            .fields
            .iter()
            .find(|(_, field)| !is_primitive(&field.field_type))
        {
            Some((field_name, field)) => Err(SchemaError::UnknownFieldType {
                kind: DefinitionKind::Structure,
                name: self.name.clone(),
                field: field_name.clone(),
                field_type: field.field_type.clone(),
            }),
            None => Ok(()),
        }
    }
}
