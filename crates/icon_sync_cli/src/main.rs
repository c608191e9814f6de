//! icon-sync CLI
//!
//! Export icon components from a Figma file to a size-grouped JSON bundle.

use anyhow::Result;
use clap::{Parser, Subcommand};
use icon_sync::{ExportConfig, SizeBucket};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::{IconSyncFile, Overrides, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "icon-sync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Export Figma icons to icons-data.json", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ./icon-sync.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Figma file key
    #[arg(long, global = true, env = "FIGMA_FILE_KEY")]
    file_key: Option<String>,

    /// Node id of the icon page (e.g. 221:911)
    #[arg(long, global = true, env = "FIGMA_NODE_ID")]
    node_id: Option<String>,

    /// Personal access token
    #[arg(long, global = true, env = "FIGMA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Figma API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download every icon and write the JSON bundle (default)
    Export {
        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the icons found in the document without downloading them
    List,

    /// Write a starter icon-sync.toml in the current directory
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(cli.verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    match cli.command {
        Some(Commands::Init) => cmd_init(),
        Some(Commands::List) => {
            let config = load_config(&cli, None)?;
            cmd_list(&config)
        }
        Some(Commands::Export { ref output }) => {
            let config = load_config(&cli, output.clone())?;
            cmd_export(&config)
        }
        None => {
            let config = load_config(&cli, None)?;
            cmd_export(&config)
        }
    }
}

/// Log directives used when RUST_LOG is unset
///
/// Verbose output is limited to our own crates so the HTTP stack stays quiet.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "info,icon_sync=debug,icon_sync_cli=debug"
    } else {
        "info"
    }
}

fn load_config(cli: &Cli, output: Option<PathBuf>) -> Result<ExportConfig> {
    let file = match &cli.config {
        Some(path) => IconSyncFile::load(path)?,
        None => IconSyncFile::load_from_dir(&std::env::current_dir()?)?,
    };

    file.into_export_config(Overrides {
        file_key: cli.file_key.clone(),
        node_id: cli.node_id.clone(),
        token: cli.token.clone(),
        api_base: cli.api_base.clone(),
        output,
    })
}

fn cmd_export(config: &ExportConfig) -> Result<()> {
    let summary = icon_sync::run_export(config)?;

    for (key, count) in &summary.counts {
        info!("  {}: {} icons", key, count);
    }
    for bucket in &summary.dropped {
        warn!("Bucket '{}' was skipped; see errors above", bucket);
    }
    if summary.missing_urls > 0 {
        warn!(
            "{} icons had no rendering URL and were left out",
            summary.missing_urls
        );
    }

    Ok(())
}

fn cmd_list(config: &ExportConfig) -> Result<()> {
    let buckets = icon_sync::list_icons(config)?;

    println!();
    for bucket in SizeBucket::ALL {
        let records = buckets.get(bucket);
        if records.is_empty() {
            continue;
        }
        println!("{} ({} icons)", bucket.data_key(), records.len());
        for record in records {
            println!("  {:<32} {}", bucket.display_name(&record.name), record.id);
        }
    }
    println!();
    println!("Total icons: {}", buckets.total());

    Ok(())
}

fn cmd_init() -> Result<()> {
    let path = std::env::current_dir()?.join(CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("This directory already contains {}", CONFIG_FILE);
    }

    fs::write(&path, IconSyncFile::starter().to_toml()?)?;

    info!("Created {}", path.display());
    info!("Set FIGMA_TOKEN and edit file_key/node_id, then run `icon-sync export`");

    Ok(())
}
