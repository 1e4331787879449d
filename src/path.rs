//! Entity field path resolution
//!
//! An entity field's type is a dotted path `Root.hop.hop.field`: a root
//! model, zero or more relation names walked through the model graph, and
//! a terminal field on the last model reached. Resolution is linear in the
//! number of hops; cycles in the relation graph are irrelevant because the
//! path is literal.
//!
//! Polymorphic relations have no single target model and therefore stop
//! traversal with [`PathError::CannotTraversePolymorphicRelation`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::relation::classify;
use crate::schema::{Enum, FieldType, Model, Namespace};

/// Why an entity field path failed to resolve
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("has no type path")]
    EmptyPath,

    #[error("has invalid type path '{path}': expected at least a model and a field")]
    InvalidPathShape { path: String },

    #[error("references unknown root model '{model}'")]
    UnknownRootModel { model: String },

    #[error("references unknown relationship '{relation}' in path {path}")]
    UnknownRelatedModel { relation: String, path: String },

    #[error("cannot traverse through polymorphic relationship {relation} in path {prefix}")]
    CannotTraversePolymorphicRelation { relation: String, prefix: String },

    #[error("references unknown model '{model}' (via relationship {relation}) in path {path}")]
    UnknownModel {
        model: String,
        relation: String,
        path: String,
    },

    #[error("references aliased target model {model} (via relationship {relation}) that does not exist in path {path}")]
    UnknownAliasedTargetModel {
        model: String,
        relation: String,
        path: String,
    },

    #[error("references unknown terminal field '{field}' in path {path}")]
    UnknownTerminalField { field: String, path: String },

    #[error("terminal field '{field}' has unknown non-primitive type '{field_type}'")]
    UnknownFieldType { field: String, field_type: String },
}

/// A parsed `Root.hop.field` path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    root: String,
    hops: Vec<String>,
    terminal: String,
}

impl FieldPath {
    /// Split a dotted path into root, hops and terminal field
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let mut segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.len() < 2 {
            return Err(PathError::InvalidPathShape {
                path: path.to_string(),
            });
        }

        let terminal = segments.pop().unwrap_or_default();
        let root = segments.remove(0);
        Ok(Self {
            root,
            hops: segments,
            terminal,
        })
    }

    /// Root model name
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Relation names walked after the root
    pub fn hops(&self) -> &[String] {
        &self.hops
    }

    /// Field name on the last model reached
    pub fn terminal(&self) -> &str {
        &self.terminal
    }

    /// The root followed by the first `hop_count` hops
    fn prefix(&self, hop_count: usize) -> String {
        std::iter::once(self.root.as_str())
            .chain(self.hops[..hop_count].iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix(self.hops.len()))?;
        write!(f, ".{}", self.terminal)
    }
}

/// The terminal field a path resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
    /// Model declaring the terminal field
    pub model: String,
    pub field: String,
    pub field_type: FieldType,
}

/// Resolves field paths against a snapshot of models and enums
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    models: &'a Namespace<Model>,
    enums: &'a Namespace<Enum>,
}

impl<'a> PathResolver<'a> {
    /// Resolver over the given models and enums
    pub fn new(models: &'a Namespace<Model>, enums: &'a Namespace<Enum>) -> Self {
        Self { models, enums }
    }

    /// Parse and resolve a raw dotted path
    pub fn resolve_str(&self, path: &str) -> Result<ResolvedField, PathError> {
        self.resolve(&FieldPath::parse(path)?)
    }

    /// Walk `path` from its root model to its terminal field
    pub fn resolve(&self, path: &FieldPath) -> Result<ResolvedField, PathError> {
        let mut current = self
            .models
            .get(path.root())
            .ok_or_else(|| PathError::UnknownRootModel {
                model: path.root().to_string(),
            })?;

        for (index, hop) in path.hops().iter().enumerate() {
            current = self.step(current, hop, path, index)?;
        }

        self.terminal(current, path)
    }

    /// Follow relation `hop` out of `model`
    fn step(
        &self,
        model: &'a Model,
        hop: &str,
        path: &FieldPath,
        index: usize,
    ) -> Result<&'a Model, PathError> {
        let relation = model
            .related
            .get(hop)
            .ok_or_else(|| PathError::UnknownRelatedModel {
                relation: hop.to_string(),
                path: path.to_string(),
            })?;

        if classify::is_poly(&relation.kind) {
            return Err(PathError::CannotTraversePolymorphicRelation {
                relation: hop.to_string(),
                prefix: path.prefix(index + 1),
            });
        }

        let target = relation.target_name(hop);
        self.models.get(target).ok_or_else(|| {
            if relation.aliased_target().is_some() {
                PathError::UnknownAliasedTargetModel {
                    model: target.to_string(),
                    relation: hop.to_string(),
                    path: path.to_string(),
                }
            } else {
                PathError::UnknownModel {
                    model: target.to_string(),
                    relation: hop.to_string(),
                    path: path.to_string(),
                }
            }
        })
    }

    fn terminal(&self, model: &Model, path: &FieldPath) -> Result<ResolvedField, PathError> {
        let name = path.terminal();
        let field = model
            .fields
            .get(name)
            .ok_or_else(|| PathError::UnknownTerminalField {
                field: name.to_string(),
                path: path.to_string(),
            })?;

        let field_type = FieldType::resolve(&field.field_type, self.enums).ok_or_else(|| {
            PathError::UnknownFieldType {
                field: name.to_string(),
                field_type: field.field_type.clone(),
            }
        })?;

        Ok(ResolvedField {
            model: model.name.clone(),
            field: name.to_string(),
            field_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::Relation;
    use crate::schema::{EnumKind, Field, Identifier, Primitive};

    fn model(name: &str) -> Model {
        Model::new(name)
            .with_field("ID", Field::new("AutoIncrement"))
            .with_identifier("primary", Identifier::new(["ID"]))
    }

    fn graph() -> (Namespace<Model>, Namespace<Enum>) {
        let person = model("Person")
            .with_field("FirstName", Field::new("String"))
            .with_field("Nationality", Field::new("Nationality"))
            .with_field("Mood", Field::new("Mood"))
            .with_relation("Company", Relation::new("ForOne"))
            .with_relation("WorkContact", Relation::new("ForOne").with_aliased("ContactInfo"))
            .with_relation("Missing", Relation::new("ForOne"))
            .with_relation("Ghost", Relation::new("ForOne").with_aliased("Phantom"));
        let company = model("Company")
            .with_field("Name", Field::new("String"))
            .with_relation("Address", Relation::new("HasOne"));
        let address = model("Address").with_field("Street", Field::new("String"));
        let contact = model("ContactInfo").with_field("Email", Field::new("String"));
        let post = model("Post")
            .with_field("Title", Field::new("String"))
            .with_relation("Comments", Relation::new("HasManyPoly").with_through("Commentable"));

        let models = [person, company, address, contact, post]
            .into_iter()
            .map(|m| (m.name.clone(), m))
            .collect();

        let mut enums = Namespace::new();
        enums.insert(
            "Nationality".to_string(),
            Enum::new("Nationality", EnumKind::String).with_entry("DE", "German"),
        );
        (models, enums)
    }

    #[test]
    fn test_parse_segments() {
        let path = FieldPath::parse("Person.Company.Address.Street").unwrap();
        assert_eq!(path.root(), "Person");
        assert_eq!(path.hops(), ["Company", "Address"]);
        assert_eq!(path.terminal(), "Street");
        assert_eq!(path.to_string(), "Person.Company.Address.Street");
    }

    #[test]
    fn test_parse_rejects_short_paths() {
        assert_eq!(FieldPath::parse(""), Err(PathError::EmptyPath));
        assert_eq!(
            FieldPath::parse("Person"),
            Err(PathError::InvalidPathShape {
                path: "Person".to_string()
            })
        );
    }

    #[test]
    fn test_direct_field() {
        let (models, enums) = graph();
        let resolved = PathResolver::new(&models, &enums).resolve_str("Person.FirstName").unwrap();
        assert_eq!(resolved.model, "Person");
        assert_eq!(resolved.field_type, FieldType::Primitive(Primitive::String));
    }

    #[test]
    fn test_multi_hop() {
        let (models, enums) = graph();
        let resolved = PathResolver::new(&models, &enums)
            .resolve_str("Person.Company.Address.Street")
            .unwrap();
        assert_eq!(resolved.model, "Address");
        assert_eq!(resolved.field, "Street");
    }

    #[test]
    fn test_aliased_hop() {
        let (models, enums) = graph();
        let resolved = PathResolver::new(&models, &enums)
            .resolve_str("Person.WorkContact.Email")
            .unwrap();
        assert_eq!(resolved.model, "ContactInfo");
    }

    #[test]
    fn test_enum_terminal() {
        let (models, enums) = graph();
        let resolved = PathResolver::new(&models, &enums)
            .resolve_str("Person.Nationality")
            .unwrap();
        assert_eq!(resolved.field_type, FieldType::Enum("Nationality".to_string()));
    }

    #[test]
    fn test_unknown_root() {
        let (models, enums) = graph();
        let err = PathResolver::new(&models, &enums).resolve_str("Nobody.Name").unwrap_err();
        assert_eq!(err, PathError::UnknownRootModel { model: "Nobody".to_string() });
    }

    #[test]
    fn test_unknown_relation() {
        let (models, enums) = graph();
        let err = PathResolver::new(&models, &enums)
            .resolve_str("Person.Employer.Name")
            .unwrap_err();
        assert!(matches!(
            err,
            PathError::UnknownRelatedModel { ref relation, .. } if relation == "Employer"
        ));
    }

    #[test]
    fn test_relation_to_unregistered_model() {
        let (models, enums) = graph();
        let resolver = PathResolver::new(&models, &enums);

        let err = resolver.resolve_str("Person.Missing.Name").unwrap_err();
        assert!(matches!(err, PathError::UnknownModel { ref model, .. } if model == "Missing"));

        let err = resolver.resolve_str("Person.Ghost.Name").unwrap_err();
        assert!(matches!(
            err,
            PathError::UnknownAliasedTargetModel { ref model, .. } if model == "Phantom"
        ));
    }

    #[test]
    fn test_polymorphic_hop_is_rejected() {
        let (models, enums) = graph();
        let err = PathResolver::new(&models, &enums)
            .resolve_str("Post.Comments.Text")
            .unwrap_err();
        assert_eq!(
            err,
            PathError::CannotTraversePolymorphicRelation {
                relation: "Comments".to_string(),
                prefix: "Post.Comments".to_string(),
            }
        );
        let message = err.to_string();
        assert!(message.contains("cannot traverse through polymorphic relationship Comments"));
        assert!(message.contains("in path Post.Comments"));
    }

    #[test]
    fn test_unknown_terminal() {
        let (models, enums) = graph();
        let err = PathResolver::new(&models, &enums)
            .resolve_str("Person.Company.Revenue")
            .unwrap_err();
        assert!(matches!(
            err,
            PathError::UnknownTerminalField { ref field, .. } if field == "Revenue"
        ));
    }

    #[test]
    fn test_terminal_with_unknown_type() {
        let (models, enums) = graph();
        let err = PathResolver::new(&models, &enums).resolve_str("Person.Mood").unwrap_err();
        assert_eq!(
            err,
            PathError::UnknownFieldType {
                field: "Mood".to_string(),
                field_type: "Mood".to_string(),
            }
        );
    }
}
