use crate::config::{load_config, Config, LlmConfig};
use crate::extract::{extract_with_diagnostics, ExtractionOutcome};
use crate::llm::{Answer, ChatModel, MessagesClient};
use crate::report::{answer_question, compose_report, send_rejected_report};
use crate::table::format_table;
use crate::web::{run_server, AppState};
use crate::{notify, source};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn require_config(config_path: Option<PathBuf>) -> Result<Config, Box<dyn std::error::Error>> {
    let config_path = match config_path {
        Some(path) => path,
        None => {
            eprintln!("Error: config not found");
            eprintln!("Searched locations:");
            for location in crate::config::default_config_locations() {
                eprintln!("  {}", location.display());
            }
            eprintln!("\nUse --config <path> to specify a config file, or run 'logsalvage config init' to generate one.");
            std::process::exit(1);
        }
    };

    info!(config_path = %config_path.display(), "Loading configuration");
    Ok(load_config(&config_path)?)
}

fn require_llm(config: &Config) -> Result<&LlmConfig, Box<dyn std::error::Error>> {
    config
        .llm
        .as_ref()
        .ok_or_else(|| "config has no 'llm' section; it is required to answer questions".into())
}

/// Build the status report and send it, or print it with `dry_run`.
pub async fn report(config_path: Option<PathBuf>, dry_run: bool) -> CliResult {
    let config = require_config(config_path)?;
    let source = source::from_config(&config.source)?;

    if dry_run {
        let summary = compose_report(source.as_ref(), &config.report).await;
        println!("Subject: {}\n\n{}", summary.subject, summary.body);
        return Ok(());
    }

    let notifier = notify::from_config(&config.notify)?;
    let summary = send_rejected_report(source.as_ref(), notifier.as_ref(), &config.report).await?;
    if let Some(error) = summary.error {
        warn!(error = %error, "Report was sent with an error in place of the table");
    }
    Ok(())
}

/// Ask one question and print the answer lines.
pub async fn ask(config_path: Option<PathBuf>, question: &str) -> CliResult {
    let config = require_config(config_path)?;
    let source = source::from_config(&config.source)?;
    let model = MessagesClient::new(require_llm(&config)?)?;

    match answer_question(source.as_ref(), &model, question).await {
        Answer::Lines(lines) => {
            for line in lines.values() {
                println!("{}", line);
            }
            Ok(())
        }
        Answer::Error { error } => Err(error.into()),
    }
}

/// Run the question API until Ctrl+C.
pub async fn serve(config_path: Option<PathBuf>) -> CliResult {
    let config = require_config(config_path)?;
    let source = source::from_config(&config.source)?;
    let model: Arc<dyn ChatModel> = Arc::new(MessagesClient::new(require_llm(&config)?)?);

    let state = AppState { source, model };

    info!("Starting question service, press Ctrl+C to shutdown");
    run_server(state, &config.web, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received");
    })
    .await
}

/// Recover records from a file (or stdin) and print them as a table or JSON.
pub fn extract(input: Option<&Path>, status: Option<&str>, json: bool) -> CliResult {
    let content = match input {
        Some(path) => std::fs::read(path)
            .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?,
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };
    let lines = source::decode_lines(&content);

    let extraction = extract_with_diagnostics(&lines, status);

    for failure in &extraction.failures {
        eprintln!("line {}: {}", failure.line_number, failure.error);
    }
    match extraction.outcome() {
        ExtractionOutcome::NoEvents => eprintln!("No events found in the input."),
        ExtractionOutcome::NoMatches => eprintln!("No matching entries found."),
        ExtractionOutcome::Records(_) => {}
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&extraction.records)?);
    } else {
        println!("{}", format_table(&extraction.records)?);
    }

    Ok(())
}
