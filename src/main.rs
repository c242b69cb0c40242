use clap::{Parser, Subcommand};
use sportlog_core::{FileStore, LedgerStore};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;

use commands::{
    ConfigCommand, DayCommand, FoodCommand, GoalsCommand, WaterCommand, WeekCommand,
    WorkoutCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "sportlog")]
#[command(version)]
#[command(about = "Daily water, food and workout tracker", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log and inspect water intake
    Water(WaterCommand),

    /// Manage food entries
    Food(FoodCommand),

    /// Manage workout entries
    Workout(WorkoutCommand),

    /// Show or change daily goals
    Goals(GoalsCommand),

    /// Summary for a single day
    Day(DayCommand),

    /// Weekly calendar and averages
    Week(WeekCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    init_tracing(&config);

    match cli.command {
        Some(Commands::Water(cmd)) => cmd.run(&mut open_ledger(&config)?)?,
        Some(Commands::Food(cmd)) => cmd.run(&mut open_ledger(&config)?)?,
        Some(Commands::Workout(cmd)) => cmd.run(&mut open_ledger(&config)?)?,
        Some(Commands::Goals(cmd)) => cmd.run(&mut open_ledger(&config)?)?,
        Some(Commands::Day(cmd)) => cmd.run(&open_ledger(&config)?)?,
        Some(Commands::Week(cmd)) => cmd.run(&open_ledger(&config)?)?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter.value)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_ledger(config: &Config) -> Result<LedgerStore<FileStore>, Box<dyn std::error::Error>> {
    let store = FileStore::new(config.data_dir.value.clone());
    let ledger = LedgerStore::open(store)?;
    tracing::debug!(origin = ?ledger.origin(), "ledger opened");
    Ok(ledger)
}
