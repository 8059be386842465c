//! `navcheck` — validate the navigation registry at boot.
//!
//! Usage:
//!   navcheck [-c <context-name-or-path>] [--dir <descriptor-dir>] [--no-builtin] [--resolve <path>]
//!
//! Loads the built-in descriptors and every descriptor file under the
//! configured directory, and exits non-zero on the first schema error.
//! On success prints the menu JSON, or the view implementation for
//! `--resolve`.

mod config;

use std::path::PathBuf;

use clap::Parser;
use openerp_nav::{Registry, RegistryLoader};
use tracing::info;

use config::NavConfig;

/// Navigation registry check.
#[derive(Parser, Debug)]
#[command(name = "navcheck", about = "Validate OpenERP navigation descriptors")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Descriptor directory (overrides the config file).
    #[arg(long = "dir")]
    dir: Option<PathBuf>,

    /// Skip the built-in descriptors.
    #[arg(long = "no-builtin")]
    no_builtin: bool,

    /// Print the view implementation mounted at this path instead of the menu.
    #[arg(long = "resolve")]
    resolve: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut nav_config = match &cli.config {
        Some(name) => {
            let path = NavConfig::resolve_path(name);
            info!("Loading configuration from {}", path.display());
            NavConfig::load(&path)?
        }
        None => NavConfig::default(),
    };
    if cli.dir.is_some() {
        nav_config.descriptor_dir = cli.dir.clone();
    }
    if cli.no_builtin {
        nav_config.builtin = false;
    }

    let registry = load_registry(&nav_config)?;

    match &cli.resolve {
        Some(path) => {
            let file_path = registry
                .resolve(path)
                .ok_or_else(|| anyhow::anyhow!("no view registered at {}", path))?;
            println!("{}", file_path);
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&registry.menu_json())?);
        }
    }

    Ok(())
}

fn load_registry(config: &NavConfig) -> anyhow::Result<Registry> {
    let mut loader = if config.builtin {
        RegistryLoader::new().with_builtin()
    } else {
        RegistryLoader::new()
    };

    if let Some(dir) = &config.descriptor_dir {
        let count = loader
            .load_dir(dir)
            .map_err(|e| anyhow::anyhow!("failed to load descriptors: {}", e))?;
        info!("Loaded {} descriptors from {}", count, dir.display());
    }

    loader
        .build()
        .map_err(|e| anyhow::anyhow!("invalid navigation registry: {}", e))
}
