//! Relations between definitions
//!
//! A [`Relation`] is the raw, decoded declaration. Its `type` string is
//! parsed once into a [`RelationKind`] / [`RelationShape`] when the
//! declaring definition is validated; the lexical predicates in
//! [`classify`] remain available for peers that have not been validated.

pub mod classify;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::schema::DefinitionKind;

/// A relation declared under `related:` on a model or an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Raw relation kind, e.g. `ForOne` or `HasManyPoly`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Candidate targets of a polymorphic `For` relation
    #[serde(rename = "for", default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    /// Name of the inverse relation of a polymorphic `Has` relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
    /// Real target name when it differs from the relation name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliased: Option<String>,
}

impl Relation {
    /// Create a relation of the given raw kind
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Set the candidate targets of a polymorphic `For` relation
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Set the inverse relation name
    pub fn with_through(mut self, through: impl Into<String>) -> Self {
        self.through = Some(through.into());
        self
    }

    /// Set the real target name
    pub fn with_aliased(mut self, aliased: impl Into<String>) -> Self {
        self.aliased = Some(aliased.into());
        self
    }

    /// The aliased target, ignoring blank values
    pub fn aliased_target(&self) -> Option<&str> {
        non_blank(self.aliased.as_deref())
    }

    /// The inverse relation name, ignoring blank values
    pub fn through_relation(&self) -> Option<&str> {
        non_blank(self.through.as_deref())
    }

    /// Name of the definition this relation points at
    pub fn target_name<'a>(&'a self, relation_name: &'a str) -> &'a str {
        self.aliased_target().unwrap_or(relation_name)
    }

    /// Check the relation's shape and return its typed form.
    ///
    /// `owner_kind`/`owner` name the declaring definition and `relation_name`
    /// the key the relation is declared under; they only feed the error.
    pub fn check_shape(
        &self,
        owner_kind: DefinitionKind,
        owner: &str,
        relation_name: &str,
    ) -> Result<RelationShape> {
        if self.kind.is_empty() {
            return Err(SchemaError::NoRelationType {
                kind: owner_kind,
                name: owner.to_string(),
                relation: relation_name.to_string(),
            });
        }

        let kind: RelationKind = self.kind.parse().map_err(|_| SchemaError::InvalidRelationType {
            kind: owner_kind,
            name: owner.to_string(),
            relation: relation_name.to_string(),
            relation_type: self.kind.clone(),
        })?;

        let shape = match kind {
            RelationKind::ForOne => RelationShape::ForOne,
            RelationKind::ForMany => RelationShape::ForMany,
            RelationKind::HasOne => RelationShape::HasOne,
            RelationKind::HasMany => RelationShape::HasMany,
            RelationKind::ForOnePoly | RelationKind::ForManyPoly => {
                let targets: BTreeSet<String> = self
                    .targets
                    .iter()
                    .filter(|target| !target.trim().is_empty())
                    .cloned()
                    .collect();
                if targets.is_empty() {
                    return Err(SchemaError::PolyRelationMissingFor {
                        kind: owner_kind,
                        name: owner.to_string(),
                        relation: relation_name.to_string(),
                        relation_type: self.kind.clone(),
                    });
                }
                RelationShape::ForPoly {
                    cardinality: kind.cardinality(),
                    targets,
                }
            }
            RelationKind::HasOnePoly | RelationKind::HasManyPoly => {
                let through = self.through_relation().ok_or_else(|| {
                    SchemaError::PolyRelationMissingThrough {
                        kind: owner_kind,
                        name: owner.to_string(),
                        relation: relation_name.to_string(),
                        relation_type: self.kind.clone(),
                    }
                })?;
                RelationShape::HasPoly {
                    cardinality: kind.cardinality(),
                    through: through.to_string(),
                }
            }
        };

        Ok(shape)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// How many targets a relation holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    One,
    Many,
}

/// The closed set of relation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    ForOne,
    ForMany,
    HasOne,
    HasMany,
    ForOnePoly,
    ForManyPoly,
    HasOnePoly,
    HasManyPoly,
}

impl RelationKind {
    pub const ALL: [RelationKind; 8] = [
        RelationKind::ForOne,
        RelationKind::ForMany,
        RelationKind::HasOne,
        RelationKind::HasMany,
        RelationKind::ForOnePoly,
        RelationKind::ForManyPoly,
        RelationKind::HasOnePoly,
        RelationKind::HasManyPoly,
    ];

    /// Kind as written under `type`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForOne => "ForOne",
            Self::ForMany => "ForMany",
            Self::HasOne => "HasOne",
            Self::HasMany => "HasMany",
            Self::ForOnePoly => "ForOnePoly",
            Self::ForManyPoly => "ForManyPoly",
            Self::HasOnePoly => "HasOnePoly",
            Self::HasManyPoly => "HasManyPoly",
        }
    }

    /// Owning side of the reference
    pub fn is_for(&self) -> bool {
        matches!(
            self,
            Self::ForOne | Self::ForMany | Self::ForOnePoly | Self::ForManyPoly
        )
    }

    /// Inverse side of the reference
    pub fn is_has(&self) -> bool {
        !self.is_for()
    }

    /// One of the four polymorphic kinds
    pub fn is_poly(&self) -> bool {
        matches!(
            self,
            Self::ForOnePoly | Self::ForManyPoly | Self::HasOnePoly | Self::HasManyPoly
        )
    }

    /// One or many targets
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Self::ForOne | Self::HasOne | Self::ForOnePoly | Self::HasOnePoly => Cardinality::One,
            Self::ForMany | Self::HasMany | Self::ForManyPoly | Self::HasManyPoly => {
                Cardinality::Many
            }
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the eight relation kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRelationKind(pub String);

impl fmt::Display for UnknownRelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown relation kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownRelationKind {}

impl FromStr for RelationKind {
    type Err = UnknownRelationKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownRelationKind(s.to_string()))
    }
}

/// A validated relation with its kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationShape {
    ForOne,
    ForMany,
    HasOne,
    HasMany,
    ForPoly {
        cardinality: Cardinality,
        targets: BTreeSet<String>,
    },
    HasPoly {
        cardinality: Cardinality,
        through: String,
    },
}

impl RelationShape {
    /// The kind this shape was parsed from
    pub fn kind(&self) -> RelationKind {
        match self {
            Self::ForOne => RelationKind::ForOne,
            Self::ForMany => RelationKind::ForMany,
            Self::HasOne => RelationKind::HasOne,
            Self::HasMany => RelationKind::HasMany,
            Self::ForPoly {
                cardinality: Cardinality::One,
                ..
            } => RelationKind::ForOnePoly,
            Self::ForPoly {
                cardinality: Cardinality::Many,
                ..
            } => RelationKind::ForManyPoly,
            Self::HasPoly {
                cardinality: Cardinality::One,
                ..
            } => RelationKind::HasOnePoly,
            Self::HasPoly {
                cardinality: Cardinality::Many,
                ..
            } => RelationKind::HasManyPoly,
        }
    }

    /// Polymorphic on either side
    pub fn is_poly(&self) -> bool {
        matches!(self, Self::ForPoly { .. } | Self::HasPoly { .. })
    }
}
