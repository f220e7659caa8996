use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atlas::tools::{AtlasTools, SearchProjectsRequest};
use atlas::{AtlasConfig, Registry};

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "Project registry - list, search, and locate registered projects")]
struct Cli {
    /// Atlas data directory (overrides ATLAS_DIR)
    #[arg(long, global = true)]
    atlas_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all registered projects
    List {
        /// Include data from registered providers
        #[arg(short, long)]
        enrich: bool,
    },
    /// Get full metadata for a project
    Get {
        slug: String,
    },
    /// Search projects by text, tag, or group
    Search {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value = "")]
        tag: String,
        #[arg(short, long, default_value = "")]
        group: String,
    },
    /// Detect which project a path belongs to (defaults to the working directory)
    Current {
        #[arg(default_value = "")]
        path: String,
    },
    /// Resolve a path inside a project, refusing anything outside its root
    Resolve {
        slug: String,
        relative: String,
    },
    /// List registered providers
    Providers,
}

/// Logs go to stderr so stdout carries only JSON.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "atlas=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = AtlasConfig::from_env()?;
    if let Some(dir) = cli.atlas_dir {
        config = config.with_atlas_dir(dir);
    }
    tracing::debug!(atlas_dir = %config.atlas_dir.display(), "Using Atlas directory");

    let tools = AtlasTools::new(Registry::open(config));

    match cli.command {
        Commands::List { enrich } => print_json(&tools.list_projects(enrich)?)?,
        Commands::Get { slug } => print_json(&tools.get_project(&slug)?)?,
        Commands::Search { query, tag, group } => {
            let req = SearchProjectsRequest { query, tag, group };
            print_json(&tools.search_projects(&req)?)?
        }
        Commands::Current { path } => print_json(&tools.get_current_project(&path)?)?,
        Commands::Resolve { slug, relative } => {
            print_json(&tools.resolve_path(&slug, &relative)?)?
        }
        Commands::Providers => print_json(&tools.list_providers()?)?,
    }

    Ok(())
}
