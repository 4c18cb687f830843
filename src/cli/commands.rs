//! CLI command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::args::ConfigCommand;
use crate::config::Settings;
use crate::gateway::{TaskGateway, TranscriptInput};
use crate::llm::{build_client, Action};

const REDACTED: &str = "<redacted>";

/// Build the gateway, refusing to continue without a usable backend config.
fn build_gateway(settings: &Settings) -> Result<Arc<TaskGateway>> {
    let client = build_client(settings)?;
    Ok(Arc::new(TaskGateway::new(client)))
}

/// Run the web front-end until interrupted
pub async fn serve(settings: &Settings, bind: Option<String>) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(bind) = bind {
        settings.server.bind = bind;
    }

    let addr = settings.bind_addr()?;
    let gateway = build_gateway(&settings)?;

    crate::web::serve(gateway, addr, settings.server.max_body_bytes).await
}

/// Run a single task and print the rendered fragment
pub async fn run_task(settings: &Settings, action: Action, file: Option<PathBuf>) -> Result<()> {
    let gateway = build_gateway(settings)?;

    let text = match file {
        Some(path) => read_transcript_file(&path)?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read transcript from stdin")?;
            text
        }
    };

    let output = gateway.handle(action, &TranscriptInput::new(text)).await;
    if output.is_empty() {
        tracing::warn!("Transcript is empty, nothing to {}", action);
        return Ok(());
    }

    print!("{}", output.html);
    Ok(())
}

fn read_transcript_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript file: {}", path.display()))
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(&redacted(settings))?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn redacted(settings: &Settings) -> Settings {
    let mut settings = settings.clone();
    if settings.has_api_key() {
        settings.llm.api_key = REDACTED.to_string();
    }
    settings
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    config_path: String,
    config_exists: bool,
    provider: String,
    model: String,
    endpoint: String,
    bind: String,
    checks: Vec<DoctorCheck>,
}

/// Run diagnostic checks to help troubleshoot local setup issues.
pub async fn run_doctor(settings: &Settings, json: bool) -> Result<()> {
    let report = collect_doctor_report(settings);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("medscribe doctor");
    println!(
        "config: {} ({})",
        report.config_path,
        if report.config_exists { "found" } else { "defaults" }
    );
    println!("backend: {} / {} @ {}", report.provider, report.model, report.endpoint);
    println!("bind: {}", report.bind);
    println!();

    for check in &report.checks {
        println!("{:<12} {:<8} {}", check.name, check.status, check.detail);
    }

    Ok(())
}

fn collect_doctor_report(settings: &Settings) -> DoctorReport {
    let (config_path, config_exists) = match Settings::config_path() {
        Ok(path) => {
            let exists = path.exists();
            (path.display().to_string(), exists)
        }
        Err(e) => (format!("unavailable ({})", e), false),
    };

    let mut checks = Vec::new();

    checks.push(if settings.has_api_key() {
        DoctorCheck {
            name: "credential",
            status: "ok",
            detail: "API key configured".to_string(),
        }
    } else {
        DoctorCheck {
            name: "credential",
            status: "missing",
            detail: "set llm.api_key, MEDSCRIBE_OPENAI_API_KEY, or OPENAI_API_KEY".to_string(),
        }
    });

    checks.push(match settings.llm.provider.to_lowercase().as_str() {
        "openai" => DoctorCheck {
            name: "provider",
            status: "ok",
            detail: settings.llm.provider.clone(),
        },
        other => DoctorCheck {
            name: "provider",
            status: "error",
            detail: format!("unsupported provider '{}'", other),
        },
    });

    checks.push(match settings.bind_addr() {
        Ok(addr) => DoctorCheck {
            name: "bind",
            status: "ok",
            detail: addr.to_string(),
        },
        Err(e) => DoctorCheck {
            name: "bind",
            status: "error",
            detail: e.to_string(),
        },
    });

    let endpoint = if settings.llm.endpoint.trim().is_empty() {
        "(provider default)".to_string()
    } else {
        settings.llm.endpoint.clone()
    };

    DoctorReport {
        config_path,
        config_exists,
        provider: settings.llm.provider.clone(),
        model: settings.llm.model.clone(),
        endpoint,
        bind: settings.server.bind.clone(),
        checks,
    }
}
