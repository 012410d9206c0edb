//! CLI application for sorting CFDI invoice XML files.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{classify, config, inspect};

/// CFDI classifier - Sort invoice XML files into date / series / code folders
#[derive(Parser)]
#[command(name = "cfdi")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every XML file in a directory
    Classify(classify::ClassifyArgs),

    /// Show how a single file would be classified
    Inspect(inspect::InspectArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity, unless RUST_LOG overrides it
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Classify(args) => classify::run(args, cli.config.as_deref()).await,
        Commands::Inspect(args) => inspect::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    }
}
