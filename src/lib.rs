//! Schema definition core
//!
//! Semantic checks for a schema-definition toolchain. Definitions come in
//! four kinds, each decoded from its own file suffix:
//!
//! | kind      | suffix  | refers to                          |
//! |-----------|---------|------------------------------------|
//! | enum      | `.enum` | nothing                            |
//! | structure | `.str`  | primitives only                    |
//! | model     | `.mod`  | enums, other models via relations  |
//! | entity    | `.ent`  | model fields by path, other entities |
//!
//! Data flows one way: decoded definitions are normalized, validated against
//! what is already registered, then committed to the [`Registry`].
//!
//! ## Example
//!
//! ```no_run
//! use schemas_core::{Registry, SchemaConfig};
//!
//! let config = SchemaConfig::load()?;
//! let registry = Registry::from_config(&config);
//! let summary = registry.load_all(&config.directories)?;
//! println!("{summary}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod path;
pub mod registry;
pub mod relation;
pub mod schema;

pub use config::{DirectoryConfig, SchemaConfig};
pub use error::{InverseMismatch, Result, SchemaError};
pub use loader::{DefinitionSource, ScanError, YamlSource};
pub use normalize::Normalize;
pub use path::{FieldPath, PathError, PathResolver, ResolvedField};
pub use registry::{Registry, RegistrySummary};
pub use relation::{Cardinality, Relation, RelationKind, RelationShape};
pub use schema::{
    DefinitionKind, Entity, EntityField, Enum, EnumKind, Field, FieldType, Identifier, Model,
    Namespace, Primitive, Structure,
};
