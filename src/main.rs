//! medscribe - Consultation transcripts in, SOAP notes and differential diagnoses out
//!
//! Entry point for the medscribe CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medscribe::cli::{Cli, Commands};
use medscribe::config::{ConfigSource, Settings};

fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            medscribe::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let (settings, source) = Settings::load()?;

            let level = if cli.verbose {
                "debug"
            } else {
                settings.general.log_level.as_str()
            };
            init_logging(level);

            match &source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loaded configuration from {}", path.display());
                }
                ConfigSource::Defaults => {
                    tracing::info!("No config file found, using defaults");
                }
            }

            // Execute command
            match command {
                Commands::Serve { bind } => {
                    medscribe::cli::commands::serve(&settings, bind).await?;
                }
                Commands::Run { action, file } => {
                    medscribe::cli::commands::run_task(&settings, action, file).await?;
                }
                Commands::Doctor { json } => {
                    medscribe::cli::commands::run_doctor(&settings, json).await?;
                }
                Commands::Config(config_cmd) => {
                    medscribe::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
