//! Ticketwatch CLI
//!
//! Command-line interface for Ticketwatch: feed ticket payloads through the
//! change detector and inspect the stored snapshots.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ticketwatch_core::logging_facility::{self, Profile};
use ticketwatch_engine::{TrackerConfig, TrackerRegistry};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "ticketwatch")]
#[command(about = "Ticketwatch - Detect meaningful changes in ticket webhooks", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding partition files (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Partition to operate on (defaults to the configured default partition)
    #[arg(long, global = true)]
    partition: Option<String>,

    /// Log output: development (human) or production (JSON)
    #[arg(long, global = true, default_value = "development")]
    log_format: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Receive one ticket payload and report what changed
    Receive(commands::receive::ReceiveArgs),
    /// List stored tickets
    List(commands::list::ListArgs),
    /// Show one stored ticket
    Show(commands::show::ShowArgs),
    /// Remove every ticket in the partition
    Clear,
    /// Print the number of stored tickets
    Count,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }

    let registry = TrackerRegistry::open(config);
    let tracker = match &cli.partition {
        Some(partition) => registry.tracker(partition)?,
        None => registry.default_tracker()?,
    };

    match cli.command {
        Commands::Receive(args) => commands::receive::execute(args, &tracker),
        Commands::List(args) => commands::list::execute(args, &tracker),
        Commands::Show(args) => commands::show::execute(args, &tracker),
        Commands::Clear => commands::clear::execute(&tracker),
        Commands::Count => commands::count::execute(&tracker),
    }
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_format);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
