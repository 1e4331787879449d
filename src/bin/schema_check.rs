//! Schema Check CLI
//!
//! Loads definition directories into a registry, validates them and
//! inspects the result.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use schemas_core::{DefinitionKind, Registry, SchemaConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-check")]
#[command(about = "Validate schema definitions and resolve entity fields")]
struct Cli {
    /// Config file (defaults to schemas.toml lookup)
    #[arg(short, long)]
    config: Option<String>,

    /// Override the definitions root directory
    #[arg(short, long)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate every definition directory
    Check,

    /// Print the resolved terminal type of every field of an entity
    Resolve {
        /// Entity name
        entity: String,
    },

    /// Print one definition as JSON
    Show {
        #[arg(value_enum)]
        kind: Kind,
        name: String,
    },

    /// Write a default config file
    Init {
        #[arg(short, long, default_value = "schemas.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Enum,
    Model,
    Entity,
    Structure,
}

impl From<Kind> for DefinitionKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Enum => DefinitionKind::Enum,
            Kind::Model => DefinitionKind::Model,
            Kind::Entity => DefinitionKind::Entity,
            Kind::Structure => DefinitionKind::Structure,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Check => {
            let (config, registry) = load(cli.config.as_deref(), cli.root)?;
            println!("🔍 Checking definitions in {}", config.root_path().display());
            registry.validate_definitions()?;
            println!("✅ {}", registry.summary());
        }

        Commands::Resolve { entity } => {
            let (_, registry) = load(cli.config.as_deref(), cli.root)?;
            let definition = registry.get_entity(&entity)?;
            let resolved =
                definition.resolve_fields(&registry.all_models(), &registry.all_enums())?;

            println!("{entity}");
            for (field, target) in &resolved {
                println!(
                    "  {field}: {} -> {}.{} ({})",
                    definition.fields[field].path, target.model, target.field, target.field_type
                );
            }
        }

        Commands::Show { kind, name } => {
            let (_, registry) = load(cli.config.as_deref(), cli.root)?;
            let json = match DefinitionKind::from(kind) {
                DefinitionKind::Enum => serde_json::to_string_pretty(&registry.get_enum(&name)?)?,
                DefinitionKind::Model => serde_json::to_string_pretty(&registry.get_model(&name)?)?,
                DefinitionKind::Entity => {
                    serde_json::to_string_pretty(&registry.get_entity(&name)?)?
                }
                DefinitionKind::Structure => {
                    serde_json::to_string_pretty(&registry.get_structure(&name)?)?
                }
            };
            println!("{json}");
        }

        Commands::Init { output, force } => {
            if output.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", output.display());
            }
            SchemaConfig::default()
                .save(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("✅ Wrote {}", output.display());
        }
    }

    Ok(())
}

/// Load config and every definition directory it names
fn load(
    config_path: Option<&str>,
    root: Option<PathBuf>,
) -> anyhow::Result<(SchemaConfig, Registry)> {
    let mut config = SchemaConfig::load_from(config_path).context("failed to load config")?;
    if let Some(root) = root {
        config.directories.root = root;
    }

    let registry = Registry::from_config(&config);
    registry
        .load_all(&config.directories)
        .with_context(|| {
            format!("failed to load definitions from {}", config.root_path().display())
        })?;
    Ok((config, registry))
}
