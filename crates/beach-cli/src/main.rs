mod cmd;
mod output;

use anyhow::Context;
use beach_core::config::{Config, StoreBackend, DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "beachsafe",
    about = "BeachSafe backend: serve beach conditions and keep safety flags consistent",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (created by `beachsafe setup`)
    #[arg(long, global = true, env = "BEACHSAFE_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Store backend, overriding the config file and BEACH_STORE
    #[arg(long, global = true)]
    store: Option<StoreBackend>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API, seeding an empty store on startup
    Serve {
        /// Port to listen on (default: config file, then PORT, then 3000)
        #[arg(long)]
        port: Option<u16>,

        /// Skip seeding the store on startup
        #[arg(long)]
        no_seed: bool,
    },

    /// Seed the store from the catalog if it is empty
    Bootstrap,

    /// Recompute every safety flag and fix the stale ones
    SyncCheck,

    /// List every stored beach
    List,

    /// Show one beach by id
    Show { id: String },

    /// Search beaches by name or location
    Search { query: Option<String> },

    /// Store Firebase service-account credentials in the config file
    Setup {
        /// Path to the service-account JSON (read from stdin when omitted)
        #[arg(long)]
        service_account: Option<PathBuf>,

        /// Realtime Database URL, if it differs from the project default
        #[arg(long)]
        database_url: Option<String>,
    },
}

fn load_config(path: &Path, store: Option<StoreBackend>) -> anyhow::Result<Config> {
    let mut config = Config::load_with_env(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    if let Some(backend) = store {
        config.store.backend = backend;
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = || load_config(&cli.config, cli.store);
    let json = cli.json;

    let result = match cli.command {
        Commands::Serve { port, no_seed } => {
            config().and_then(|c| cmd::serve::run(&c, port, no_seed))
        }
        Commands::Bootstrap => config().and_then(|c| cmd::sync::bootstrap(&c, json)),
        Commands::SyncCheck => config().and_then(|c| cmd::sync::sync_check(&c, json)),
        Commands::List => config().and_then(|c| cmd::beaches::list(&c, json)),
        Commands::Show { id } => config().and_then(|c| cmd::beaches::show(&c, &id, json)),
        Commands::Search { query } => {
            config().and_then(|c| cmd::beaches::search(&c, query.as_deref(), json))
        }
        Commands::Setup {
            service_account,
            database_url,
        } => cmd::setup::run(
            &cli.config,
            service_account.as_deref(),
            database_url.as_deref(),
        ),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
