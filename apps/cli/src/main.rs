//! `modninja`: browse mod installations from the command line.
//!
//! Every subcommand prints its answer as JSON on stdout; logs go to stderr.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use modninja_file_ops::human_size;
use modninja_igdb::{Client, CoverCache, CoverFetcher};
use modninja_session::{ExportFormat, Session, format_display_name};
use modninja_store::{JsonFileStore, KeyValueStore};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use config::Config;

/// File name of the key-value store inside the data directory.
const STORE_FILE: &str = "store.json";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Use this config file instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find game installations on every volume, plus custom roots
    Discover,
    /// Register a mods directory as a custom installation
    AddRoot { mods_dir: PathBuf },
    /// List mod folders of a mods directory
    List {
        mods_dir: PathBuf,
        /// Raw listing: include hidden folders and ignore the saved order
        #[arg(long)]
        raw: bool,
    },
    /// Size, file and folder counts of a directory
    Stats { dir: PathBuf },
    /// Relative paths below a directory, capped
    Tree {
        dir: PathBuf,
        /// Print an indented tree instead of JSON paths
        #[arg(long)]
        render: bool,
    },
    /// Timestamps and stats of one mod
    Info { mods_dir: PathBuf, name: String },
    /// First readme found in a mod
    Readme { mods_dir: PathBuf, name: String },
    /// Screenshot files of a mod
    Screenshots { mods_dir: PathBuf, name: String },
    /// Resolve the cover image of an installation id
    Cover { id: String },
    /// Delete downloaded covers and the cover index (manual overrides are kept)
    ClearCovers,
    /// Print the saved mod order
    LoadOrder { mods_dir: PathBuf },
    /// Save a mod order
    SaveOrder {
        mods_dir: PathBuf,
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Export the mod list of a mods directory
    Export {
        mods_dir: PathBuf,
        /// txt, json or csv
        #[arg(short, long, default_value = "txt")]
        format: ExportFormat,
        /// Output file; defaults to `modlist.<format>` in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show settings, optionally changing `showHidden`
    Settings {
        #[arg(long)]
        show_hidden: Option<bool>,
    },
    /// Delete a mods directory and everything in it
    DeleteMods {
        mods_dir: PathBuf,
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
    /// Human-readable form of an installation id
    Name { id: String },
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_session(config: &Config) -> anyhow::Result<Session> {
    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(data_dir.join(STORE_FILE)));
    let covers = CoverFetcher::new(
        Client::new(config.igdb())?,
        CoverCache::in_data_dir(&data_dir),
        Arc::clone(&store),
    );

    if config.client_id.is_empty() {
        tracing::debug!("no IGDB credentials configured; only cached covers are available");
    }

    Ok(Session::new(store, covers).with_app_name(&config.discovery_app_name))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let session = build_session(&config)?;

    match args.command {
        Commands::Discover => print_json(&session.discover_installations().await?),
        Commands::AddRoot { mods_dir } => print_json(&session.add_custom_root(&mods_dir)?),
        Commands::List { mods_dir, raw } => {
            let mods = if raw {
                session.list_entries(&mods_dir).await?
            } else {
                session.mod_list(&mods_dir).await?
            };
            print_json(&mods)
        }
        Commands::Stats { dir } => {
            let stats = session.aggregate_stats(&dir).await?;
            print_json(&json!({
                "size": stats.size,
                "files": stats.files,
                "folders": stats.folders,
                "human": human_size(stats.size),
            }))
        }
        Commands::Tree { dir, render } => {
            if render {
                for line in session.file_tree(&dir).await?.render_lines() {
                    println!("{line}");
                }
                Ok(())
            } else {
                print_json(&session.list_tree_paths(&dir).await?)
            }
        }
        Commands::Info { mods_dir, name } => print_json(&session.mod_info(&mods_dir, &name).await?),
        Commands::Readme { mods_dir, name } => {
            print_json(&session.mod_readme(&mods_dir, &name).await?)
        }
        Commands::Screenshots { mods_dir, name } => {
            print_json(&session.mod_screenshots(&mods_dir, &name).await?)
        }
        Commands::Cover { id } => print_json(&session.get_cover_image(&id).await),
        Commands::ClearCovers => {
            let removed = session.clear_cover_cache()?;
            print_json(&json!({ "removed": removed }))
        }
        Commands::LoadOrder { mods_dir } => print_json(&session.load_order(&mods_dir).await?),
        Commands::SaveOrder { mods_dir, names } => {
            session.save_order(&mods_dir, &names).await?;
            print_json(&true)
        }
        Commands::Export {
            mods_dir,
            format,
            output,
        } => {
            let mods = session.mod_list(&mods_dir).await?;
            if mods.is_empty() {
                bail!("no mods in {}", mods_dir.display());
            }
            let path = output.unwrap_or_else(|| PathBuf::from(format.default_file_name()));
            let file_name = session.export_list(&mods, format, &path)?;
            print_json(&json!({ "file": file_name }))
        }
        Commands::Settings { show_hidden } => {
            let mut settings = session.load_settings();
            if let Some(show) = show_hidden {
                settings.show_hidden = show;
                session.save_settings(&settings)?;
            }
            print_json(&settings)
        }
        Commands::DeleteMods { mods_dir, yes } => {
            if !yes {
                bail!("refusing to delete {} without --yes", mods_dir.display());
            }
            session.delete_mods(&mods_dir).await?;
            print_json(&true)
        }
        Commands::Name { id } => print_json(&format_display_name(&id)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!(command = ?args.command, "starting");
    run(args).await
}
