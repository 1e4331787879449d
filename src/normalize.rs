//! Whitespace normalization of freshly decoded definitions
//!
//! Runs before validation so that names written as `" Person "` in a
//! definition file compare equal to `Person` everywhere else.

use std::collections::BTreeMap;

use crate::relation::Relation;
use crate::schema::{Entity, EntityField, Enum, Field, Identifier, Model, Structure};

/// In-place trimming of every name, key and type in a definition
pub trait Normalize {
    fn normalize(&mut self);
}

/// Normalize every definition of a batch
pub fn normalize_all<'a, T, I>(definitions: I)
where
    T: Normalize + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    for definition in definitions {
        definition.normalize();
    }
}

fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn trim_all(values: &mut [String]) {
    values.iter_mut().for_each(trim);
}

fn trim_optional(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        trim(inner);
    }
    if value.as_deref().is_some_and(str::is_empty) {
        *value = None;
    }
}

/// Rebuild a map with trimmed keys, normalizing each value on the way
fn trim_keys<V, F>(map: &mut BTreeMap<String, V>, mut normalize_value: F)
where
    F: FnMut(&mut V),
{
    *map = std::mem::take(map)
        .into_iter()
        .map(|(key, mut value)| {
            normalize_value(&mut value);
            (key.trim().to_string(), value)
        })
        .collect();
}

impl Normalize for Field {
    fn normalize(&mut self) {
        trim(&mut self.field_type);
        trim_all(&mut self.attributes);
    }
}

impl Normalize for EntityField {
    fn normalize(&mut self) {
        trim(&mut self.path);
        trim_all(&mut self.attributes);
    }
}

impl Normalize for Identifier {
    fn normalize(&mut self) {
        trim_all(&mut self.fields);
    }
}

impl Normalize for Relation {
    fn normalize(&mut self) {
        trim(&mut self.kind);
        trim_all(&mut self.targets);
        trim_optional(&mut self.through);
        trim_optional(&mut self.aliased);
    }
}

impl Normalize for Enum {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim(&mut self.kind);
        trim_keys(&mut self.entries, |_| {});
    }
}

impl Normalize for Structure {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim_keys(&mut self.fields, Field::normalize);
    }
}

impl Normalize for Model {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim_keys(&mut self.fields, Field::normalize);
        trim_keys(&mut self.identifiers, Identifier::normalize);
        trim_keys(&mut self.related, Relation::normalize);
    }
}

impl Normalize for Entity {
    fn normalize(&mut self) {
        trim(&mut self.name);
        trim_keys(&mut self.fields, EntityField::normalize);
        trim_keys(&mut self.identifiers, Identifier::normalize);
        trim_keys(&mut self.related, Relation::normalize);
    }
}
