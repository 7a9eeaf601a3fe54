mod commands;
mod config;
mod display;
mod process;
mod session;
mod sync;
mod tree;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;
use sync::ReparentPolicy;

#[derive(Parser)]
#[command(name = "proctree")]
#[command(about = "Live process tree and table kept in sync with periodic snapshots")]
#[command(version = "0.1.0")]
#[command(author = "Pedro Nieto")]
struct Cli {
    /// Settings file (defaults to $PROCTREE_CONFIG or the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured reparent policy
    #[arg(long, global = true, value_enum)]
    reparent: Option<ReparentPolicy>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the process tree from one snapshot
    Tree {
        /// Read the snapshot from a TOML file instead of the live system
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Only show matching processes and their ancestors
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show the flat process table from one snapshot
    Table {
        /// Read the snapshot from a TOML file instead of the live system
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Limit number of rows
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Poll the live system and report each sync pass
    Watch {
        /// Stop after this many polls
        #[arg(long)]
        ticks: Option<u64>,
        /// Poll interval in milliseconds
        #[arg(long)]
        interval: Option<u64>,
        /// Print the tree after every poll
        #[arg(long)]
        print: bool,
    },
    /// Sync consecutive snapshot files and show every model change
    Replay {
        #[arg(required = true)]
        snapshots: Vec<PathBuf>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut settings = match &cli.config {
        Some(path) => config::load_settings_from(path)?,
        None => config::load_settings()?,
    };
    if let Some(policy) = cli.reparent {
        settings.reparent = policy;
    }

    handle_cli_command(cli.command, &settings).await
}

async fn handle_cli_command(command: Option<Commands>, settings: &config::Settings) -> Result<()> {
    use commands::CliHandler;

    match command {
        Some(Commands::Tree { snapshot, search }) => {
            CliHandler::show_tree(settings, snapshot.as_deref(), search.as_deref()).await?;
        }
        Some(Commands::Table { snapshot, limit }) => {
            CliHandler::show_table(settings, snapshot.as_deref(), limit).await?;
        }
        Some(Commands::Watch {
            ticks,
            interval,
            print,
        }) => {
            let interval = interval.map(Duration::from_millis);
            CliHandler::watch(settings, ticks, interval, print).await?;
        }
        Some(Commands::Replay { snapshots }) => {
            CliHandler::replay(settings, &snapshots).await?;
        }
        None => {
            // Default to the live monitor
            CliHandler::watch(settings, None, None, true).await?;
        }
    }

    Ok(())
}
