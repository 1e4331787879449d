//! Checks shared by the model and entity validators
//!
//! Both kinds declare identifiers over their own fields and relations to
//! peers of the same kind; only the peer namespace differs.

use std::collections::BTreeMap;

use super::{DefinitionKind, Identifier, Namespace};
use crate::error::{InverseMismatch, Result, SchemaError};
use crate::relation::{classify, Relation, RelationShape};

/// A definition that declares relations to peers of its own kind
pub(crate) trait Related {
    fn relations(&self) -> &BTreeMap<String, Relation>;
}

/// Every identifier lists at least one field and only declared fields
pub(crate) fn check_identifiers<F>(
    kind: DefinitionKind,
    name: &str,
    identifiers: &BTreeMap<String, Identifier>,
    has_field: F,
) -> Result<()>
where
    F: Fn(&str) -> bool,
{
    for (identifier_name, identifier) in identifiers {
        if identifier.fields.is_empty() {
            return Err(SchemaError::NoIdentifierFields {
                kind,
                name: name.to_string(),
                identifier: identifier_name.clone(),
            });
        }
        if let Some(missing) = identifier.fields.iter().find(|field| !has_field(field)) {
            return Err(SchemaError::UnknownIdentifierField {
                kind,
                name: name.to_string(),
                identifier: identifier_name.clone(),
                field: missing.clone(),
            });
        }
    }
    Ok(())
}

/// Shape, aliasing and polymorphic-inverse checks for every relation of `owner`
pub(crate) fn check_relations<P: Related>(
    kind: DefinitionKind,
    owner: &str,
    relations: &BTreeMap<String, Relation>,
    peers: &Namespace<P>,
) -> Result<()> {
    for (relation_name, relation) in relations {
        let shape = relation.check_shape(kind, owner, relation_name)?;

        let Some(aliased) = relation.aliased_target() else {
            continue;
        };
        let Some(peer) = peers.get(aliased) else {
            return Err(SchemaError::UnknownAliasedTarget {
                kind,
                name: owner.to_string(),
                relation: relation_name.clone(),
                aliased: aliased.to_string(),
            });
        };

        if let RelationShape::HasPoly { through, .. } = &shape {
            check_inverse(kind, owner, relation_name, aliased, through, peer)?;
        }
    }
    Ok(())
}

/// The aliased peer's `through` relation must be a polymorphic `For`
/// relation that lists `owner` among its targets.
fn check_inverse<P: Related>(
    kind: DefinitionKind,
    owner: &str,
    relation_name: &str,
    aliased: &str,
    through: &str,
    peer: &P,
) -> Result<()> {
    let mismatch = |reason| {
        SchemaError::polymorphic_inverse(kind, owner, relation_name, aliased, through, reason)
    };

    // Peers may not have been validated yet, so classify their raw kind.
    let inverse = peer
        .relations()
        .get(through)
        .ok_or_else(|| mismatch(InverseMismatch::MissingThrough))?;

    if !classify::is_poly_for(&inverse.kind) {
        return Err(mismatch(InverseMismatch::NotForPoly {
            relation_type: inverse.kind.clone(),
        }));
    }

    if !inverse.targets.iter().any(|target| target.trim() == owner) {
        return Err(mismatch(InverseMismatch::NotInForList));
    }

    Ok(())
}
