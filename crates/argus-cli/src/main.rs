//! Argus CLI - tail and inspect event streams from a seeded simulator

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "argus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the JSON seed file with per-object event histories
    #[arg(short, long, default_value = "./events.json")]
    seed: PathBuf,

    /// Emit records as JSON instead of formatted lines
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display events for the given objects (KIND:ID), or all seeded
    /// objects when none are named
    Events {
        /// Follow the event streams
        #[arg(short = 'f', long)]
        tail: bool,

        /// Events per page read
        #[arg(short = 'n', long, default_value_t = 25)]
        page_size: u32,

        /// Disable the number-of-objects-to-monitor limit
        #[arg(long)]
        force: bool,

        /// Include only the specified event types
        #[arg(long = "type")]
        kinds: Vec<String>,

        /// Long listing format (include key and type)
        #[arg(short, long)]
        long: bool,

        /// Object references, e.g. VirtualMachine:vm-1
        objects: Vec<String>,
    },

    /// Print the service's event classification map
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Events {
            tail,
            page_size,
            force,
            kinds,
            long,
            objects,
        } => {
            let opts = commands::events::EventsArgs {
                tail,
                page_size,
                force,
                kinds,
                long,
                objects,
            };
            commands::events::execute(cli.seed, cli.json, opts).await?;
        }
        Commands::Categories => {
            commands::categories::execute(cli.seed, cli.json).await?;
        }
    }

    Ok(())
}
