mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::serve::ServeArgs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pressure",
    about = "AI Ethics Under Pressure: classroom crisis simulation server",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML config file (defaults are used when omitted)
    #[arg(long, global = true, env = "PRESSURE_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation web server
    Serve(ServeArgs),

    /// List the crisis catalog
    Crises,

    /// Show the news timeline with its crisis triggers
    Timeline {
        /// Only show months whose name contains this text
        #[arg(long)]
        month: Option<String>,
    },

    /// Check the config and scenario for mistakes
    Validate,
}

fn main() {
    // A missing .env file is fine; values may come from the real environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve(_) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Serve(args) => cmd::serve::run(config, args),
        Commands::Crises => cmd::crises::run(config, cli.json),
        Commands::Timeline { month } => cmd::timeline::run(config, month.as_deref(), cli.json),
        Commands::Validate => cmd::validate::run(config, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
