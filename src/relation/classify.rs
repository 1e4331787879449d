//! Lexical relation-kind classification
//!
//! Case-insensitive predicates over the raw `type` string of a relation.
//! They never decide whether a kind is valid; that is the job of
//! [`RelationKind`](super::RelationKind) parsing in the validators.

/// Starts with `for`
pub fn is_for(relation_type: &str) -> bool {
    relation_type.to_lowercase().starts_with("for")
}

/// Starts with `has`
pub fn is_has(relation_type: &str) -> bool {
    relation_type.to_lowercase().starts_with("has")
}

/// Contains `one`
pub fn is_one(relation_type: &str) -> bool {
    relation_type.to_lowercase().contains("one")
}

/// Contains `many`
pub fn is_many(relation_type: &str) -> bool {
    relation_type.to_lowercase().contains("many")
}

/// Poly relations still need an ownership prefix; a bare `Poly` is nothing.
pub fn is_poly(relation_type: &str) -> bool {
    (is_for(relation_type) || is_has(relation_type))
        && relation_type.to_lowercase().ends_with("poly")
}

/// Polymorphic and owning
pub fn is_poly_for(relation_type: &str) -> bool {
    is_poly(relation_type) && is_for(relation_type)
}

/// Polymorphic and inverse
pub fn is_poly_has(relation_type: &str) -> bool {
    is_poly(relation_type) && is_has(relation_type)
}

/// Polymorphic with a single target
pub fn is_poly_one(relation_type: &str) -> bool {
    is_poly(relation_type) && is_one(relation_type)
}

/// Polymorphic with many targets
pub fn is_poly_many(relation_type: &str) -> bool {
    is_poly(relation_type) && is_many(relation_type)
}
