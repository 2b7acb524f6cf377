//! The two callers of the extractor: the status report sent as a
//! notification, and question answering over every recovered record.
//!
//! Both catch collaborator failures and turn them into values, so a bad
//! upstream never takes the caller down with it.

use crate::config::ReportConfig;
use crate::extract::{extract_with_diagnostics, Extraction, ExtractionOutcome};
use crate::llm::{build_prompt, split_answer, Answer, ChatModel, LlmError};
use crate::notify::{Notifier, NotifyError};
use crate::source::{LogSource, SourceError};
use crate::table::{format_table, TableError};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to fetch log lines: {0}")]
    Source(#[from] SourceError),

    #[error("failed to render table: {0}")]
    Table(#[from] TableError),

    #[error("failed to generate the answer: {0}")]
    Llm(#[from] LlmError),

    #[error("failed to send notification: {0}")]
    Notify(#[from] NotifyError),
}

/// Records pulled from a source and rendered as a table.
#[derive(Debug)]
pub struct RenderedRecords {
    pub extraction: Extraction,
    pub table: String,
}

/// Fetches lines from `source`, recovers records (optionally filtered by
/// status) and renders them.
pub async fn render_from_source(
    source: &dyn LogSource,
    filter_status: Option<&str>,
) -> Result<RenderedRecords, ReportError> {
    let lines = source.fetch_lines().await?;
    info!(source = %source.describe(), lines = lines.len(), "Fetched log lines");

    let extraction = extract_with_diagnostics(&lines, filter_status);
    log_outcome(&extraction, filter_status);

    let table = format_table(&extraction.records)?;
    Ok(RenderedRecords { extraction, table })
}

fn log_outcome(extraction: &Extraction, filter_status: Option<&str>) {
    match extraction.outcome() {
        ExtractionOutcome::NoEvents => warn!("No events retrieved from the log source"),
        ExtractionOutcome::NoMatches => info!(
            lines = extraction.lines_seen,
            failed = extraction.failures.len(),
            status = filter_status.unwrap_or("*"),
            "No matching entries found"
        ),
        ExtractionOutcome::Records(count) => info!(
            records = count,
            failed = extraction.failures.len(),
            status = filter_status.unwrap_or("*"),
            "Recovered records"
        ),
    }
}

/// What was (or would have been) sent by [`send_rejected_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub subject: String,
    pub body: String,
    /// Rows in the table; zero when the report carries an error instead.
    pub rows: usize,
    /// Set when the body carries an error instead of a table.
    pub error: Option<String>,
}

/// Builds the notification for records with `settings.status` and publishes
/// it. Fetch and render failures are reported in the body; only a failed
/// delivery is returned as an error.
pub async fn send_rejected_report(
    source: &dyn LogSource,
    notifier: &dyn Notifier,
    settings: &ReportConfig,
) -> Result<ReportSummary, ReportError> {
    let summary = compose_report(source, settings).await;

    match notifier.publish(&summary.subject, &summary.body).await {
        Ok(()) => {
            info!(subject = %summary.subject, rows = summary.rows, "Notification sent");
            Ok(summary)
        }
        Err(e) => {
            error!(error = %e, "Error sending notification");
            Err(e.into())
        }
    }
}

/// Builds the report without sending it.
pub async fn compose_report(source: &dyn LogSource, settings: &ReportConfig) -> ReportSummary {
    let subject = settings.subject.clone();

    match render_from_source(source, Some(&settings.status)).await {
        Ok(rendered) => ReportSummary {
            subject,
            body: format!("{}\n\n{}", settings.label, rendered.table),
            rows: rendered.extraction.records.len(),
            error: None,
        },
        Err(e) => {
            error!(error = %e, "Report could not be built");
            ReportSummary {
                subject,
                body: format!("{}\n\nError: {}", settings.label, e),
                rows: 0,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Answers `question` using every recovered record as context.
pub async fn answer_question(
    source: &dyn LogSource,
    model: &dyn ChatModel,
    question: &str,
) -> Answer {
    info!(question = %question, "Answering question");

    match try_answer(source, model, question).await {
        Ok(answer) => answer,
        Err(e) => {
            error!(error = %e, "Error generating the details");
            Answer::error(format!("Error generating the details: {}", e))
        }
    }
}

async fn try_answer(
    source: &dyn LogSource,
    model: &dyn ChatModel,
    question: &str,
) -> Result<Answer, ReportError> {
    let rendered = render_from_source(source, None).await?;
    let prompt = build_prompt(question, &rendered.table);
    let text = model.complete(&prompt).await?;
    Ok(Answer::Lines(split_answer(&text)))
}
