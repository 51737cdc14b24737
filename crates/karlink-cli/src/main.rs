use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use karlink_core::Config;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;
mod input;

#[derive(Parser)]
#[command(name = "karlink")]
#[command(about = "Kirby Air Ride multiworld link")]
#[command(version)]
struct Args {
    /// Client configuration file
    #[arg(short, long, default_value = "karlink.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the link against Dolphin (default)
    Run {
        /// Location table, overrides the config file
        #[arg(short, long)]
        locations: Option<PathBuf>,

        /// Slot data JSON to start an offline session with
        #[arg(short, long)]
        slot: Option<PathBuf>,

        /// Read /commands from stdin instead of watching single keys
        #[arg(long)]
        console: bool,
    },
    /// Print the item table
    Items {
        /// Include checkbox rewards from this location table
        #[arg(short, long)]
        locations: Option<PathBuf>,
    },
    /// Build an item pool and slot data from options
    Generate {
        /// Options JSON (defaults when omitted)
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Location table, overrides the config file
        #[arg(short, long)]
        locations: Option<PathBuf>,

        /// Seed for the pool shuffle (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the generated pool and slot data as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print what the game currently looks like from Dolphin
    Probe {
        /// Also count filled checklist boxes from this location table
        #[arg(short, long)]
        locations: Option<PathBuf>,
    },
    /// Dump emulated RAM in hex
    Hexdump {
        /// Console address (hex, e.g. 0x80000000)
        address: String,

        #[arg(short, long, default_value = "256")]
        size: usize,

        /// Show the ASCII column
        #[arg(short, long)]
        ascii: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("karlink=info".parse()?))
        .init();

    let args = Args::parse();
    let config = load_config(&args.config);

    match args.command.unwrap_or(Command::Run {
        locations: None,
        slot: None,
        console: false,
    }) {
        Command::Run {
            locations,
            slot,
            console,
        } => commands::run::run(&config, locations.as_deref(), slot.as_deref(), console),
        Command::Items { locations } => commands::items::run(locations.as_deref()),
        Command::Generate {
            options,
            locations,
            seed,
            output,
        } => commands::generate::run(
            options.as_deref(),
            locations.as_deref().unwrap_or(&config.client.locations),
            seed,
            output.as_deref(),
        ),
        Command::Probe { locations } => commands::probe::run(locations.as_deref()),
        Command::Hexdump {
            address,
            size,
            ascii,
        } => {
            let address = commands::hexdump::parse_console_address(&address)?;
            commands::hexdump::run(address, size, ascii)
        }
    }
}

fn load_config(path: &Path) -> Config {
    match Config::load(path) {
        Ok(config) => {
            info!("Loaded config from {}", path.display());
            config
        }
        Err(e) if e.is_not_found() => {
            debug!("No config at {}, using defaults", path.display());
            Config::default()
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        }
    }
}
