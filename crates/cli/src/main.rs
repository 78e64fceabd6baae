//! Krishi CLI
//!
//! Command-line interface for the Krishi agricultural advisory service.
//! Answers questions from a fixed knowledge base, optionally augmented by
//! watsonx.ai text generation.

mod commands;
mod history;

use clap::{Parser, Subcommand};
use commands::{AskCommand, HistoryCommand, StatsCommand};
use krishi_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Krishi - agricultural question answering with offline retrieval
#[derive(Parser, Debug)]
#[command(name = "krishi")]
#[command(about = "Agricultural question answering with offline retrieval", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "KRISHI_CONFIG")]
    config: Option<PathBuf>,

    /// Caller identity recorded with each query
    #[arg(short, long, global = true, env = "KRISHI_USER")]
    user: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask an agricultural question
    Ask(AskCommand),

    /// Show recent query history
    History(HistoryCommand),

    /// Show usage statistics
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from file and environment
    let config = AppConfig::load()?;

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.config,
        cli.user,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::debug!("User: {}", config.user);
    tracing::debug!("History database: {:?}", config.history_path);
    tracing::debug!("Embedding provider: {}", config.embedding.provider);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::History(_) => "history",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::History(cmd) => cmd.execute(&config),
        Commands::Stats(cmd) => cmd.execute(&config),
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {}", e);
    }

    result
}
