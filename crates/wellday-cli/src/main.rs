use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "wellday", version, about = "Wellday CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Food diary
    Food {
        #[command(subcommand)]
        action: commands::food::FoodAction,
    },
    /// Water log
    Water {
        #[command(subcommand)]
        action: commands::water::WaterAction,
    },
    /// Habit tracker
    Habit {
        #[command(subcommand)]
        action: commands::habit::HabitAction,
    },
    /// Personal data and daily intake
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Product catalog
    Product {
        #[command(subcommand)]
        action: commands::product::ProductAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("WELLDAY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Food { action } => commands::food::run(action),
        Commands::Water { action } => commands::water::run(action),
        Commands::Habit { action } => commands::habit::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Product { action } => commands::product::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
