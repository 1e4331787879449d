//! Cross-definition validation through the registry: entity path
//! resolution and polymorphic relation consistency.

use std::fs;
use std::path::{Path, PathBuf};

use schemas_core::{
    DirectoryConfig, FieldType, InverseMismatch, PathError, PathResolver, Primitive, Registry,
    SchemaError,
};
use tempfile::TempDir;

const COMMENT_FEED: &str = concat!(
    "name: CommentFeed\n",
    "fields:\n  id:\n    type: Post.ID\n  text:\n    type: Post.Comments.Text\n",
    "identifiers:\n  primary: id\n",
);

/// Comment model whose polymorphic `for` list leaves out Post
const COMMENT_FOR_ARTICLE: &str = concat!(
    "name: Comment\n",
    "fields:\n  ID:\n    type: AutoIncrement\n",
    "identifiers:\n  primary: ID\n",
    "related:\n  Commentable:\n    type: ForOnePoly\n    for: [Article]\n",
);

const COMMENT_WITHOUT_TARGETS: &str = concat!(
    "name: Comment\n",
    "fields:\n  ID:\n    type: AutoIncrement\n",
    "identifiers:\n  primary: ID\n",
    "related:\n  Commentable:\n    type: ForOnePoly\n",
);

fn fixtures_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/registry")
}

/// A scratch copy of the whole fixture tree
fn scratch_fixtures() -> TempDir {
    let dir = TempDir::new().unwrap();
    for kind in ["enums", "structures", "models", "entities"] {
        let target = dir.path().join(kind);
        fs::create_dir_all(&target).unwrap();
        for entry in fs::read_dir(fixtures_path().join(kind)).unwrap() {
            let entry = entry.unwrap();
            fs::copy(entry.path(), target.join(entry.file_name())).unwrap();
        }
    }
    dir
}

fn loaded_registry() -> Registry {
    let registry = Registry::new();
    registry.load_all(&DirectoryConfig::under(fixtures_path())).unwrap();
    registry
}

// =============================================================================
// Entity field resolution
// =============================================================================

#[test]
fn test_resolve_person_view_fields() {
    let registry = loaded_registry();
    let view = registry.get_entity("PersonView").unwrap();
    let resolved = view
        .resolve_fields(&registry.all_models(), &registry.all_enums())
        .unwrap();

    assert_eq!(resolved["name"].model, "Person");
    assert_eq!(resolved["name"].field_type, FieldType::Primitive(Primitive::String));
    assert_eq!(resolved["company"].model, "Company");
    assert_eq!(resolved["country"].field_type, FieldType::Enum("Country".to_string()));
    assert_eq!(resolved["email"].model, "ContactInfo");
    assert_eq!(resolved["nationality"].field_type.to_string(), "enum Nationality");
}

#[test]
fn test_resolver_over_registry_snapshot() {
    let registry = loaded_registry();
    let models = registry.all_models();
    let enums = registry.all_enums();
    let resolver = PathResolver::new(&models, &enums);

    let author = resolver.resolve_str("Post.Author.FirstName").unwrap();
    assert_eq!(author.model, "Person");

    let err = resolver.resolve_str("Post.Comments.Text").unwrap_err();
    assert_eq!(
        err,
        PathError::CannotTraversePolymorphicRelation {
            relation: "Comments".to_string(),
            prefix: "Post.Comments".to_string(),
        }
    );

    let err = resolver.resolve_str("Person.Company.Revenue").unwrap_err();
    assert!(matches!(err, PathError::UnknownTerminalField { .. }));
}

#[test]
fn test_entity_through_polymorphic_relation_is_rejected_on_load() {
    let dir = scratch_fixtures();
    fs::write(dir.path().join("entities/comment_feed.ent"), COMMENT_FEED).unwrap();

    let registry = Registry::new();
    let err = registry
        .load_all(&DirectoryConfig::under(dir.path()))
        .unwrap_err();

    let message = err.to_string();
    assert!(
        message.contains("cannot traverse through polymorphic relationship Comments"),
        "{message}"
    );
    assert!(message.contains("Post.Comments"), "{message}");
    assert!(matches!(
        err,
        SchemaError::EntityField { ref entity, .. } if entity == "CommentFeed"
    ));

    // models committed, entity batch rejected as a whole
    assert!(registry.has_models());
    assert!(!registry.has_entities());
}

#[test]
fn test_entity_aliasing_uses_entity_namespace() {
    let dir = scratch_fixtures();
    // "Company" is a model; an entity relation must alias an entity
    let view = fs::read_to_string(dir.path().join("entities/person_view.ent"))
        .unwrap()
        .replace("aliased: CompanyView", "aliased: Company");
    fs::write(dir.path().join("entities/person_view.ent"), view).unwrap();

    let registry = Registry::new();
    let err = registry
        .load_all(&DirectoryConfig::under(dir.path()))
        .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::UnknownAliasedTarget { ref aliased, .. } if aliased == "Company"
    ));
}

// =============================================================================
// Polymorphic inverse consistency
// =============================================================================

#[test]
fn test_polymorphic_inverse_requires_for_list_membership() {
    let dir = scratch_fixtures();
    fs::write(dir.path().join("models/comment.mod"), COMMENT_FOR_ARTICLE).unwrap();

    let registry = Registry::new();
    let err = registry
        .load_all(&DirectoryConfig::under(dir.path()))
        .unwrap_err();

    assert!(matches!(
        err,
        SchemaError::PolymorphicInverse { reason: InverseMismatch::NotInForList, .. }
    ));
    let message = err.to_string();
    for name in ["Post", "Commentable", "Comment"] {
        assert!(message.contains(name), "{message}");
    }
    assert!(!registry.has_models());
}

#[test]
fn test_poly_for_relation_requires_targets() {
    let dir = scratch_fixtures();
    fs::write(dir.path().join("models/comment.mod"), COMMENT_WITHOUT_TARGETS).unwrap();

    let registry = Registry::new();
    let err = registry
        .load_all(&DirectoryConfig::under(dir.path()))
        .unwrap_err();
    assert!(matches!(err, SchemaError::PolyRelationMissingFor { .. }));
}

#[test]
fn test_invalid_relation_kind() {
    let dir = scratch_fixtures();
    let person = fs::read_to_string(dir.path().join("models/person.mod"))
        .unwrap()
        .replace(
            "type: ForOne\n    aliased: ContactInfo",
            "type: BelongsTo\n    aliased: ContactInfo",
        );
    fs::write(dir.path().join("models/person.mod"), person).unwrap();

    let registry = Registry::new();
    let err = registry
        .load_all(&DirectoryConfig::under(dir.path()))
        .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::InvalidRelationType { ref relation_type, .. } if relation_type == "BelongsTo"
    ));
}

#[test]
fn test_validation_can_be_disabled() {
    let dir = scratch_fixtures();
    fs::write(dir.path().join("models/comment.mod"), COMMENT_FOR_ARTICLE).unwrap();

    let registry = Registry::new().with_validation(false);
    registry
        .load_all(&DirectoryConfig::under(dir.path()))
        .unwrap();
    assert!(registry.validate().is_ok());
    assert!(registry.validate_definitions().is_err());
}
