use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lobe_application::{SessionStore, StoreOptions};
use lobe_core::settings::StaticSettingsProvider;
use lobe_infrastructure::{LobeConfig, TomlSessionService, load_config, load_default_config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "lobe")]
#[command(about = "Manage the local chat session directory", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session data file, overriding the configured one
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sessions by partition
    List {
        /// Print the raw session list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a session
    Create {
        /// Session title
        title: Option<String>,
        /// Group to place the session in
        #[arg(long)]
        group: Option<String>,
        /// Pin the new session
        #[arg(long)]
        pin: bool,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Duplicate a session
    Duplicate { id: String },
    /// Pin a session
    Pin { id: String },
    /// Unpin a session
    Unpin { id: String },
    /// Move a session to a group
    Move { id: String, group: String },
    /// Rename a session
    Rename { id: String, title: String },
    /// Remove a session
    Remove { id: String },
    /// Remove every session
    Clear {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },
    /// Search sessions by title, description or tag
    Search { keyword: String },
    /// Create a session group
    GroupAdd { name: String },
    /// Rename a session group
    GroupRename { id: String, name: String },
    /// Remove a session group; its sessions move to the default list
    GroupRemove { id: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(cli: &Cli) -> Result<LobeConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path).with_context(|| format!("Failed to load {:?}", path))?,
        None => load_default_config().context("Failed to load default configuration")?,
    };
    if let Some(data) = &cli.data {
        config.data_file = Some(data.clone());
    }
    Ok(config)
}

fn open_store(config: &LobeConfig) -> Result<SessionStore> {
    let data_file = config
        .data_file()
        .context("Failed to resolve session data file")?;
    tracing::debug!("[lobe] using data file {:?}", data_file);

    let service = Arc::new(TomlSessionService::new(data_file));
    let store = SessionStore::new(service)
        .with_settings(Arc::new(StaticSettingsProvider::new(
            config.default_agent.clone(),
        )))
        .with_notifier(Arc::new(console::ConsoleNotifier))
        .with_options(StoreOptions {
            locale: config.locale,
            orphan_group_policy: config.orphan_group_policy,
        });
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load(&cli)?;
    let store = open_store(&config)?;

    store
        .fetch_sessions(true)
        .await
        .context("Failed to load sessions")?;

    match cli.command {
        Commands::List { json } => commands::list::run(&store, json)?,
        Commands::Create {
            title,
            group,
            pin,
            description,
            avatar,
        } => {
            let draft = commands::session::draft(title, group, pin, description, avatar);
            commands::session::create(&store, draft).await?
        }
        Commands::Duplicate { id } => commands::session::duplicate(&store, &id).await?,
        Commands::Pin { id } => commands::session::pin(&store, &id, true).await?,
        Commands::Unpin { id } => commands::session::pin(&store, &id, false).await?,
        Commands::Move { id, group } => commands::session::move_to(&store, &id, &group).await?,
        Commands::Rename { id, title } => commands::session::rename(&store, &id, &title).await?,
        Commands::Remove { id } => commands::session::remove(&store, &id).await?,
        Commands::Clear { yes } => commands::session::clear(&store, yes).await?,
        Commands::Search { keyword } => commands::search::run(&store, &keyword).await?,
        Commands::GroupAdd { name } => commands::group::add(&store, &name).await?,
        Commands::GroupRename { id, name } => commands::group::rename(&store, &id, &name).await?,
        Commands::GroupRemove { id } => commands::group::remove(&store, &id).await?,
    }

    Ok(())
}
