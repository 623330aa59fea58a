#![forbid(unsafe_code)]

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use field_editor::config::AppSettings;
use field_editor::model::FieldDefinition;
use field_editor::preset::{self, ApplyReport, CatalogKind, PresetRegistry};
use field_editor::state::{Category, FieldEditState};

/// Inspect and edit field definitions by path, and apply catalog presets
#[derive(Parser)]
#[command(name = "field-editor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Catalog root, overriding the settings file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List editable paths
    Paths {
        /// Only this category
        category: Option<String>,

        /// Leaf paths only
        #[arg(long)]
        leaves: bool,
    },

    /// Print the value at a path
    Get {
        path: String,

        /// Definition file or name in the definitions directory
        #[arg(short, long)]
        definition: Option<String>,
    },

    /// Set the value at a path
    Set {
        path: String,

        /// JSON value; anything unparseable is taken as a string
        value: String,

        #[arg(short, long)]
        definition: Option<String>,

        /// Write here instead of back to the definition
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List presets
    Presets {
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List fragments
    Fragments {
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Apply presets in order (`id` or `category/id`)
    Apply {
        #[arg(required = true)]
        presets: Vec<String>,

        #[arg(short, long)]
        definition: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply one fragment
    Fragment {
        category: String,
        id: String,

        #[arg(short, long)]
        definition: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Definition argument resolved to a path, plus the state loaded from it
struct Session {
    source: Option<PathBuf>,
    state: FieldEditState,
}

impl Session {
    fn open(settings: &AppSettings, definition: Option<&str>) -> Result<Self> {
        let Some(name) = definition else {
            return Ok(Self {
                source: None,
                state: FieldEditState::new(),
            });
        };
        let path = settings.definition_path(name);
        let loaded = FieldDefinition::load(&path)?;
        Ok(Self {
            source: Some(path),
            state: FieldEditState::from_definition(&loaded),
        })
    }

    /// Write to `output`, else back to the source, else stdout
    fn finish(self, output: Option<PathBuf>) -> Result<()> {
        let definition = self.state.to_definition();
        match output.or(self.source) {
            Some(path) => definition.save(&path)?,
            None => {
                let json = serde_json::to_string_pretty(&definition)
                    .context("Failed to serialize definition")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn report_outcome(report: &ApplyReport) {
    if !report.ignored.is_empty() {
        warn!(ignored = ?report.ignored, "Some keys were not applied");
    }
    info!(
        applied = report.applied,
        layers_appended = report.layers_appended,
        layers_merged = report.layers_merged,
        primitives_appended = report.primitives_appended,
        primitives_merged = report.primitives_merged,
        "Done"
    );
}

fn list(registry: &mut PresetRegistry, category: Option<&str>) {
    let entries = match category {
        Some(c) => registry.in_category(c),
        None => registry.entries().iter().collect(),
    };
    for entry in entries {
        let affected: Vec<&str> = entry.affected_categories.iter().map(String::as_str).collect();
        println!(
            "{}/{}\t{}\t[{}]\t{}",
            entry.category,
            entry.id,
            entry.name,
            affected.join(", "),
            entry.hint
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = AppSettings::load()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.log_level())
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let catalog_dir = cli.catalog.unwrap_or_else(|| settings.catalog_dir.clone());

    match cli.command {
        Commands::Paths { category, leaves } => {
            let state = FieldEditState::new();
            let categories = match category {
                Some(name) => {
                    let Some(category) = Category::from_prefix(&name) else {
                        bail!("Unknown category {name:?}");
                    };
                    vec![category]
                }
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                for path in state.paths(category, leaves) {
                    println!("{path}");
                }
            }
        }
        Commands::Get { path, definition } => {
            let session = Session::open(&settings, definition.as_deref())?;
            let value = session
                .state
                .get(&path)
                .with_context(|| format!("No value at path {path:?}"))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Set {
            path,
            value,
            definition,
            output,
        } => {
            let mut session = Session::open(&settings, definition.as_deref())?;
            if !session.state.set(&path, &parse_value(&value)) {
                bail!("Path {path:?} was not applied");
            }
            session.finish(output)?;
        }
        Commands::Presets { category } => {
            let mut registry = PresetRegistry::open(&catalog_dir, CatalogKind::Presets);
            list(&mut registry, category.as_deref());
        }
        Commands::Fragments { category } => {
            let mut registry = PresetRegistry::open(&catalog_dir, CatalogKind::Fragments);
            list(&mut registry, category.as_deref());
        }
        Commands::Apply {
            presets,
            definition,
            output,
        } => {
            let mut session = Session::open(&settings, definition.as_deref())?;
            let mut registry = PresetRegistry::open(&catalog_dir, CatalogKind::Presets);
            let mut total = ApplyReport::default();
            for key in &presets {
                let entry = registry
                    .find(key)
                    .cloned()
                    .with_context(|| format!("Preset {key:?} not found under {:?}", catalog_dir))?;
                total.absorb(preset::apply(&mut session.state, &entry));
            }
            report_outcome(&total);
            session.finish(output)?;
        }
        Commands::Fragment {
            category,
            id,
            definition,
            output,
        } => {
            let mut session = Session::open(&settings, definition.as_deref())?;
            let mut registry = PresetRegistry::open(&catalog_dir, CatalogKind::Fragments);
            let key = format!("{category}/{id}");
            let entry = registry
                .find(&key)
                .cloned()
                .with_context(|| format!("Fragment {key:?} not found under {:?}", catalog_dir))?;
            let report = preset::apply(&mut session.state, &entry);
            report_outcome(&report);
            session.finish(output)?;
        }
    }

    Ok(())
}
