mod actors;
mod api;
mod config;
mod directory;
mod engine;
mod models;
mod report;
mod shell;
mod storage;
mod types;

use std::io::{BufWriter, Write, stderr, stdout};
use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use tokio::io::{BufReader, stdin};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use crate::actors::ConnectionMonitor;
use crate::api::{BalanceStore, DataSource, LedgerClient};
use crate::config::Config;
use crate::directory::ClientDirectory;
use crate::models::{CacheState, ErrorKind};
use crate::shell::{BalanceDraft, Session, Shell, render_listing, render_statement};
use crate::storage::{FileStorage, MemoryStorage, ResponseCache, Storage};
use crate::types::{ClientId, format_currency, today};

#[derive(Parser)]
#[command(name = "cuenta-corriente")]
#[command(about = "Customer ledger statements with running balances and initial balances")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ledger API base URL, overrides the configuration file
    #[arg(long, global = true, env = "LEDGER_BASE_URL")]
    base_url: Option<String>,

    /// Directory for the offline response cache
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "error")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List clients, optionally filtered by name or number
    Clients {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the reconciled movements of a client
    Movements {
        client_id: ClientId,

        /// Write the movements to an .xlsx or .csv file (or into a directory)
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Read, set or delete a client's initial balance
    Balance {
        #[command(subcommand)]
        action: BalanceAction,
    },
    /// Check whether the ledger API answers
    Health,
    /// Interactive session
    Shell,
}

#[derive(Subcommand)]
enum BalanceAction {
    Get {
        client_id: ClientId,
    },
    Set {
        client_id: ClientId,

        /// Amount in cents without separators, e.g. 150075 for 1500,75
        digits: String,

        #[arg(long, short = 'n')]
        negative: bool,

        /// Effective date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    Delete {
        client_id: ClientId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }

    if let Some(cache_dir) = &cli.cache_dir {
        config.cache_dir = Some(cache_dir.clone());
    }

    let timer = Instant::now();

    let result = match config.cache_directory() {
        Some(directory) => {
            let storage = FileStorage::new(directory);
            info!("Offline cache at {}", storage.directory().display());
            execute(cli.command, &config, Arc::new(storage)).await
        }
        None => execute(cli.command, &config, Arc::new(MemoryStorage::new())).await,
    };

    info!("Finished in: {:?}", timer.elapsed());

    if let Err(failure) = result {
        eprintln!("{failure}");
        exit(1);
    }

    Ok(())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the statements, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

/// Runs one command. Errors carry the operator-facing message only.
async fn execute<S: Storage>(command: Commands, config: &Config, storage: Arc<S>) -> Result<()> {
    let client = LedgerClient::new(config)?;
    let source = Arc::new(DataSource::new(client.clone(), ResponseCache::new(storage, config.cache_ttl())));
    let mut output = BufWriter::new(stdout().lock());

    match command {
        Commands::Clients { search } => {
            let directory = ClientDirectory::new(source, config.directory_ttl());
            let listing = directory.listing().await.map_err(|failure| anyhow!(failure.user_message()))?;

            write!(output, "{}", render_listing(&listing, search.as_deref().unwrap_or_default()))?;
        }
        Commands::Movements { client_id, export } => {
            let mut session = Session::new(source, Arc::new(client));
            session.select(client_id).map_err(|failure| anyhow!(failure.user_message()))?;
            session.fetch().await.map_err(|failure| anyhow!(failure.user_message()))?;

            if let Some(statement) = session.statement() {
                write!(output, "{}", render_statement(statement, today()))?;
            }

            if let Some(path) = export {
                let written = session.export(&path).map_err(|failure| anyhow!(failure.user_message()))?;
                writeln!(output, "Exported to {}", written.display())?;
            }
        }
        Commands::Balance { action } => balance(action, source, client, &mut output).await?,
        Commands::Health => {
            if !client.health().await {
                return Err(anyhow!(ErrorKind::Connectivity.user_message(CacheState::Absent)))
            }

            writeln!(output, "Connected to {}", config.base_url)?;
        }
        Commands::Shell => {
            drop(output);

            let directory = Arc::new(ClientDirectory::new(source.clone(), config.directory_ttl()));
            let connectivity = ConnectionMonitor::spawn(client.clone(), directory.clone(), config.health_interval());
            let session = Session::new(source, Arc::new(client));

            let mut shell = Shell::new(session, directory, connectivity);
            shell.run(BufReader::new(stdin()), &mut stdout()).await?;

            return Ok(())
        }
    }

    output.flush()?;

    Ok(())
}

async fn balance<S: Storage, W: Write>(action: BalanceAction, source: Arc<DataSource<S>>, client: LedgerClient, output: &mut W) -> Result<()> {
    match action {
        BalanceAction::Get { client_id } => {
            let balance = client.get(client_id).await.map_err(|failure| {
                error!("Reading initial balance for client [{client_id}] failed: {failure}");
                anyhow!(failure.kind().user_message(CacheState::Absent))
            })?;

            match balance {
                Some(balance) => writeln!(output, "Saldo Inicial: {} ({})", format_currency(balance.amount), balance.date)?,
                None => writeln!(output, "No initial balance set for client {client_id}")?,
            }
        }
        BalanceAction::Set { client_id, digits, negative, date } => {
            let mut session = Session::new(source, Arc::new(client));
            session.select(client_id).map_err(|failure| anyhow!(failure.user_message()))?;

            let draft = BalanceDraft { amount_text: digits, negative, date };
            let saved = session.save_balance(draft).await.map_err(|failure| anyhow!(failure.user_message()))?;

            writeln!(output, "Initial balance saved: {} ({})", format_currency(saved.amount), saved.date)?;
        }
        BalanceAction::Delete { client_id } => {
            let mut session = Session::new(source, Arc::new(client));
            session.select(client_id).map_err(|failure| anyhow!(failure.user_message()))?;
            session.delete_balance().await.map_err(|failure| anyhow!(failure.user_message()))?;

            writeln!(output, "Initial balance deleted for client {client_id}")?;
        }
    }

    Ok(())
}
