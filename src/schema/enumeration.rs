//! Enum definitions

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DefinitionKind;
use crate::error::{Result, SchemaError};

/// A named, closed set of literal entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    #[serde(default)]
    pub name: String,
    /// Raw value kind, one of `String`, `Integer` or `Float`
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub entries: BTreeMap<String, EnumValue>,
}

/// Value kind shared by every entry of an enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnumKind {
    String,
    Integer,
    Float,
}

impl EnumKind {
    /// Kind as written under `type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Float => "Float",
        }
    }

    /// Whether `value` is a legal entry for this kind; floats accept integers
    pub fn accepts(&self, value: &EnumValue) -> bool {
        matches!(
            (self, value),
            (Self::String, EnumValue::String(_))
                | (Self::Integer, EnumValue::Integer(_))
                | (Self::Float, EnumValue::Float(_) | EnumValue::Integer(_))
        )
    }
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnumKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "String" => Ok(Self::String),
            "Integer" => Ok(Self::Integer),
            "Float" => Ok(Self::Float),
            _ => Err(()),
        }
    }
}

/// Literal value of an enum entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    Integer(i64),
    Float(f64),
    String(String),
}

impl From<&str> for EnumValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for EnumValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for EnumValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl Enum {
    /// Create an enum of the given kind with no entries
    pub fn new(name: impl Into<String>, kind: EnumKind) -> Self {
        Self {
            name: name.into(),
            kind: kind.as_str().to_string(),
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace an entry
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<EnumValue>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// The declared kind, if it is a known one
    pub fn enum_kind(&self) -> Option<EnumKind> {
        self.kind.parse().ok()
    }

    /// Check name, kind and that every entry holds a value of the declared kind
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SchemaError::NoName {
                kind: DefinitionKind::Enum,
            });
        }

        let kind = self
            .enum_kind()
            .ok_or_else(|| SchemaError::InvalidEnumType {
                name: self.name.clone(),
                enum_type: self.kind.clone(),
            })?;

        if self.entries.is_empty() {
            return Err(SchemaError::NoEntries {
                name: self.name.clone(),
            });
        }

        if let Some((entry, _)) = self.entries.iter().find(|(_, value)| !kind.accepts(value)) {
            return Err(SchemaError::EnumEntryTypeMismatch {
                name: self.name.clone(),
                entry: entry.clone(),
                expected: kind.to_string(),
            });
        }

        Ok(())
    }
}
