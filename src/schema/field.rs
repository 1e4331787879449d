//! Field, identifier and primitive type declarations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Enum, Namespace};

/// Built-in field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    #[serde(rename = "UUID")]
    Uuid,
    AutoIncrement,
    String,
    Integer,
    Float,
    Time,
    Date,
    Boolean,
    Protected,
    Sealed,
}

impl Primitive {
    pub const ALL: [Primitive; 10] = [
        Primitive::Uuid,
        Primitive::AutoIncrement,
        Primitive::String,
        Primitive::Integer,
        Primitive::Float,
        Primitive::Time,
        Primitive::Date,
        Primitive::Boolean,
        Primitive::Protected,
        Primitive::Sealed,
    ];

    /// Tag as written in definition files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uuid => "UUID",
            Self::AutoIncrement => "AutoIncrement",
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Float => "Float",
            Self::Time => "Time",
            Self::Date => "Date",
            Self::Boolean => "Boolean",
            Self::Protected => "Protected",
            Self::Sealed => "Sealed",
        }
    }

    /// Exact, case-sensitive lookup of a primitive tag
    pub fn parse(type_name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == type_name)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `type_name` is one of the built-in primitive tags
pub fn is_primitive(type_name: &str) -> bool {
    Primitive::parse(type_name).is_some()
}

/// Typed classification of a field's declared type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum FieldType {
    Primitive(Primitive),
    Enum(String),
}

impl FieldType {
    /// Classify `type_name` as a primitive or one of `enums`
    pub fn resolve(type_name: &str, enums: &Namespace<Enum>) -> Option<Self> {
        if let Some(primitive) = Primitive::parse(type_name) {
            return Some(Self::Primitive(primitive));
        }
        enums
            .contains_key(type_name)
            .then(|| Self::Enum(type_name.to_string()))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{p}"),
            Self::Enum(name) => write!(f, "enum {name}"),
        }
    }
}

/// A typed field of a model or a structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

impl Field {
    /// Create a field of the given type with no attributes
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            attributes: Vec::new(),
        }
    }

    /// Replace the field's attributes
    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }
}

/// An entity field; its `type` is a dotted path through the model graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityField {
    #[serde(rename = "type", default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
}

impl EntityField {
    /// Create an entity field from a dotted model path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attributes: Vec::new(),
        }
    }
}

/// An ordered list of field names identifying a record.
///
/// Written either as a single field name or as a list of names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IdentifierRepr", into = "Vec<String>")]
pub struct Identifier {
    pub fields: Vec<String>,
}

impl Identifier {
    /// Create an identifier over the given field names, in order
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdentifierRepr {
    One(String),
    Many(Vec<String>),
}

impl From<IdentifierRepr> for Identifier {
    fn from(repr: IdentifierRepr) -> Self {
        match repr {
            IdentifierRepr::One(field) => Self { fields: vec![field] },
            IdentifierRepr::Many(fields) => Self { fields },
        }
    }
}

impl From<Identifier> for Vec<String> {
    fn from(identifier: Identifier) -> Self {
        identifier.fields
    }
}
