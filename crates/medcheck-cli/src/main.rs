use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use medcheck_infrastructure::{ConfigService, MedcheckPaths};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "medcheck")]
#[command(about = "Guided symptom checker backed by an AI reasoning service", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter directive (overrides the configured filter)
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive symptom checker
    Run,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List locally recorded sessions
    History,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut service = ConfigService::new(MedcheckPaths::new());
    if let Some(path) = &cli.config {
        service = service.with_path(path);
    }
    let config = service
        .get_config()
        .context("Failed to load configuration")?;

    init_tracing(cli.log.as_deref().unwrap_or(&config.logging.filter));

    match cli.command {
        Commands::Run => commands::run::run(&service, &config).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&config)?,
            ConfigAction::Path => commands::config::path(&service)?,
        },
        Commands::History => commands::history::list(&service, &config).await?,
    }

    Ok(())
}

/// Logs to stderr so output does not interleave with the prompt.
///
/// `RUST_LOG` wins over `fallback`.
fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
