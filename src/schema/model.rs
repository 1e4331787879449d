//! Model definitions and the model validator

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::rules::{self, Related};
use super::{is_primitive, DefinitionKind, Enum, Field, Identifier, Namespace};
use crate::error::{Result, SchemaError};
use crate::relation::Relation;

/// A concrete record type with typed fields, identifiers and relations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Field>,
    #[serde(default)]
    pub identifiers: BTreeMap<String, Identifier>,
    #[serde(default)]
    pub related: BTreeMap<String, Relation>,
}

impl Related for Model {
    fn relations(&self) -> &BTreeMap<String, Relation> {
        &self.related
    }
}

impl Model {
    /// Create an empty model
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

    /// Add or replace an identifier
    pub fn with_identifier(mut self, name: impl Into<String>, identifier: Identifier) -> Self {
        self.identifiers.insert(name.into(), identifier);
        self
    }

    /// Add or replace a relation
    pub fn with_relation(mut self, name: impl Into<String>, relation: Relation) -> Self {
        self.related.insert(name.into(), relation);
        self
    }

    /// Structural checks plus field types against the known enums.
    ///
    /// Relations are not looked at; see [`Model::validate_with_peers`].
    pub fn validate(&self, all_enums: &Namespace<Enum>) -> Result<()> {
        if self.name.is_empty() {
            return Err(SchemaError::NoName {
                kind: DefinitionKind::Model,
            });
        }
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields {
                kind: DefinitionKind::Model,
                name: self.name.clone(),
            });
        }
        if self.identifiers.is_empty() {
            return Err(SchemaError::NoIdentifiers {
                kind: DefinitionKind::Model,
                name: self.name.clone(),
            });
        }
        self.validate_field_types(all_enums)
    }

    /// Full validation: [`Model::validate`], identifier fields, relation
    /// shapes, aliased targets and polymorphic inverses against `all_models`.
    pub fn validate_with_peers(
        &self,
        all_models: &Namespace<Model>,
        all_enums: &Namespace<Enum>,
    ) -> Result<()> {
        self.validate(all_enums)?;
        rules::check_identifiers(DefinitionKind::Model, &self.name, &self.identifiers, |field| {
            self.fields.contains_key(field)
        })?;
        rules::check_relations(DefinitionKind::Model, &self.name, &self.related, all_models)
    }

    fn validate_field_types(&self, all_enums: &Namespace<Enum>) -> Result<()> {
        for (field_name, field) in &self.fields {
            if is_primitive(&field.field_type) || all_enums.contains_key(&field.field_type) {
                continue;
            }
            return Err(SchemaError::UnknownFieldType {
                kind: DefinitionKind::Model,
                name: self.name.clone(),
                field: field_name.clone(),
                field_type: field.field_type.clone(),
            });
        }
        Ok(())
    }

    /// Fields referenced by any identifier, skipping undeclared names
    pub fn identifier_fields(&self) -> Vec<(&str, &Field)> {
        let mut fields = Vec::new();
        for identifier in self.identifiers.values() {
            for field_name in &identifier.fields {
                match self.fields.get_key_value(field_name) {
                    Some((name, field)) => fields.push((name.as_str(), field)),
                    None => warn!(
                        model = %self.name,
                        field = %field_name,
                        "identifier field does not exist on model"
                    ),
                }
            }
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InverseMismatch;
    use crate::schema::EnumKind;

    fn enums() -> Namespace<Enum> {
        let mut enums = Namespace::new();
        enums.insert(
            "Nationality".to_string(),
            Enum::new("Nationality", EnumKind::String).with_entry("DE", "German"),
        );
        enums
    }

    fn person() -> Model {
        Model::new("Person")
            .with_field("ID", Field::new("AutoIncrement"))
            .with_field("Name", Field::new("String"))
            .with_field("Nationality", Field::new("Nationality"))
            .with_identifier("primary", Identifier::new(["ID"]))
    }

    fn models(list: impl IntoIterator<Item = Model>) -> Namespace<Model> {
        list.into_iter().map(|m| (m.name.clone(), m)).collect()
    }

    #[test]
    fn test_valid_model() {
        assert!(person().validate(&enums()).is_ok());
    }

    #[test]
    fn test_structural_checks_in_order() {
        let mut m = person();
        m.name.clear();
        m.fields.clear();
        assert!(matches!(m.validate(&enums()), Err(SchemaError::NoName { .. })));

        let mut m = person();
        m.fields.clear();
        m.identifiers.clear();
        assert!(matches!(m.validate(&enums()), Err(SchemaError::NoFields { .. })));

        let mut m = person();
        m.identifiers.clear();
        assert!(matches!(m.validate(&enums()), Err(SchemaError::NoIdentifiers { .. })));
    }

    #[test]
    fn test_unknown_field_type() {
        let err = person().validate(&Namespace::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "model 'Person' field 'Nationality' has unknown non-primitive type 'Nationality'"
        );
    }

    #[test]
    fn test_validate_ignores_relations() {
        let m = person().with_relation("Company", Relation::new("Bogus"));
        assert!(m.validate(&enums()).is_ok());
        assert!(m.validate_with_peers(&models([]), &enums()).is_err());
    }

    #[test]
    fn test_identifier_must_reference_fields() {
        let m = person().with_identifier("natural", Identifier::new(["Email"]));
        let err = m.validate_with_peers(&models([]), &enums()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownIdentifierField { ref field, .. } if field == "Email"
        ));
    }

    #[test]
    fn test_identifier_must_list_fields() {
        let m = person().with_identifier("empty", Identifier::new(Vec::<String>::new()));
        let err = m.validate_with_peers(&models([]), &enums()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::NoIdentifierFields { ref identifier, .. } if identifier == "empty"
        ));
        assert_eq!(err.to_string(), "model 'Person' identifier 'empty' has no fields");
    }

    #[test]
    fn test_unknown_aliased_target() {
        let m = person().with_relation(
            "WorkContact",
            Relation::new("ForOne").with_aliased("ContactInfo"),
        );
        let err = m.validate_with_peers(&models([]), &enums()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "model 'Person' relation 'WorkContact' has unknown aliased target: ContactInfo"
        );
    }

    #[test]
    fn test_known_aliased_target() {
        let contact = Model::new("ContactInfo")
            .with_field("ID", Field::new("AutoIncrement"))
            .with_identifier("primary", Identifier::new(["ID"]));
        let m = person()
            .with_relation("WorkContact", Relation::new("ForOne").with_aliased("ContactInfo"))
            .with_relation("HomeContact", Relation::new("ForOne").with_aliased("ContactInfo"));
        assert!(m.validate_with_peers(&models([contact]), &enums()).is_ok());
    }

    fn comment(targets: &[&str]) -> Model {
        Model::new("Comment")
            .with_field("ID", Field::new("AutoIncrement"))
            .with_field("Text", Field::new("String"))
            .with_identifier("primary", Identifier::new(["ID"]))
            .with_relation(
                "Commentable",
                Relation::new("ForOnePoly").with_targets(targets.iter().copied()),
            )
    }

    fn post() -> Model {
        Model::new("Post")
            .with_field("ID", Field::new("AutoIncrement"))
            .with_field("Title", Field::new("String"))
            .with_identifier("primary", Identifier::new(["ID"]))
            .with_relation(
                "Note",
                Relation::new("HasOnePoly")
                    .with_through("Commentable")
                    .with_aliased("Comment"),
            )
    }

    #[test]
    fn test_polymorphic_inverse_consistent() {
        let all = models([comment(&["Post", "Article"]), post()]);
        assert!(post().validate_with_peers(&all, &enums()).is_ok());
    }

    #[test]
    fn test_polymorphic_inverse_not_in_for_list() {
        let all = models([comment(&["Article"]), post()]);
        let err = post().validate_with_peers(&all, &enums()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::PolymorphicInverse { reason: InverseMismatch::NotInForList, .. }
        ));
        let message = err.to_string();
        assert!(message.contains("Post"));
        assert!(message.contains("Commentable"));
        assert!(message.contains("Comment"));
    }

    #[test]
    fn test_polymorphic_inverse_missing_through() {
        let mut c = comment(&["Post"]);
        c.related.clear();
        let all = models([c, post()]);
        let err = post().validate_with_peers(&all, &enums()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::PolymorphicInverse { reason: InverseMismatch::MissingThrough, .. }
        ));
        assert!(err.to_string().contains("does not have relationship 'Commentable'"));
    }

    #[test]
    fn test_polymorphic_inverse_not_for_poly() {
        let c = comment(&["Post"]).with_relation("Commentable", Relation::new("ForOne"));
        let all = models([c, post()]);
        let err = post().validate_with_peers(&all, &enums()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::PolymorphicInverse { reason: InverseMismatch::NotForPoly { .. }, .. }
        ));
    }

    #[test]
    fn test_identifier_fields_skips_missing() {
        let m = person().with_identifier("broken", Identifier::new(["Missing", "Name"]));
        let names: Vec<&str> = m.identifier_fields().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Name", "ID"]);
    }
}
