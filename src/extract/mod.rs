//! Recovery of structured records from log lines.
//!
//! Each line is expected to look like `<prefix> - <payload>` where the payload
//! is a JSON-like batch `[[{...}, {...}]]`. Lines are handled independently;
//! a bad line is reported and skipped, never fatal to the run.

pub mod repair;

use serde_json::{Map, Value};
use std::borrow::Cow;
use thiserror::Error;
use tracing::{debug, warn};

pub use repair::{normalize_line, quote_bare_values};

/// One recovered record. Key order is the order the fields appeared in.
pub type Record = Map<String, Value>;

/// Delimiter between a log line's prefix and its payload.
pub const PAYLOAD_SEPARATOR: &str = " - ";

/// Field compared against the status filter.
pub const STATUS_FIELD: &str = "status";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no ' - ' separator in message: {text}")]
    SeparatorMissing { text: String },

    #[error("malformed payload ({reason}) in message: {text}")]
    MalformedPayload { reason: String, text: String },
}

/// A line that was abandoned during extraction.
#[derive(Debug)]
pub struct LineFailure {
    /// 1-based position in the input.
    pub line_number: usize,
    pub error: ExtractError,
}

/// Why an extraction ended up with the records it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// There were no input lines at all.
    NoEvents,
    /// Lines were read but none produced a matching record.
    NoMatches,
    Records(usize),
}

/// Records plus per-line diagnostics from one extraction run.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub lines_seen: usize,
    pub empty_lines: usize,
    pub failures: Vec<LineFailure>,
}

impl Extraction {
    pub fn outcome(&self) -> ExtractionOutcome {
        if self.lines_seen == 0 {
            ExtractionOutcome::NoEvents
        } else if self.records.is_empty() {
            ExtractionOutcome::NoMatches
        } else {
            ExtractionOutcome::Records(self.records.len())
        }
    }
}

/// Recovers records from `lines`, keeping only those whose `status` equals
/// `filter_status` when one is given.
pub fn extract<I, S>(lines: I, filter_status: Option<&str>) -> Vec<Record>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extract_with_diagnostics(lines, filter_status).records
}

/// Same as [`extract`] but also returns what happened to every line.
pub fn extract_with_diagnostics<I, S>(lines: I, filter_status: Option<&str>) -> Extraction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extraction = Extraction::default();

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let line_number = index + 1;
        extraction.lines_seen += 1;

        if line.is_empty() {
            debug!(line = line_number, "Empty message, skipping");
            extraction.empty_lines += 1;
            continue;
        }

        match parse_line(line) {
            Ok(records) => {
                let before = extraction.records.len();
                extraction.records.extend(
                    records
                        .into_iter()
                        .filter(|record| matches_status(record, filter_status)),
                );
                debug!(
                    line = line_number,
                    kept = extraction.records.len() - before,
                    "Recovered records from line"
                );
            }
            Err(error) => {
                warn!(
                    line = line_number,
                    error = %error,
                    "Abandoning log line"
                );
                extraction.failures.push(LineFailure { line_number, error });
            }
        }
    }

    extraction
}

/// Normalizes a single non-empty line and decodes every record in its batch.
pub fn parse_line(line: &str) -> Result<Vec<Record>, ExtractError> {
    let normalized = normalize_line(line);

    // Only the second segment is the payload; anything after a further
    // separator is dropped with the rest of the split.
    let payload = normalized.split(PAYLOAD_SEPARATOR).nth(1).ok_or_else(|| {
        ExtractError::SeparatorMissing {
            text: normalized.clone(),
        }
    })?;

    let malformed = |reason: String| ExtractError::MalformedPayload {
        reason,
        text: normalized.clone(),
    };

    let value = decode_payload(payload).map_err(|e| malformed(e.to_string()))?;
    unwrap_batch(value).map_err(malformed)
}

fn decode_payload(payload: &str) -> Result<Value, serde_json::Error> {
    let strict = match serde_json::from_str(payload) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    match quote_bare_values(payload) {
        Cow::Borrowed(_) => Err(strict),
        Cow::Owned(relaxed) => serde_json::from_str(&relaxed).map_err(|_| strict),
    }
}

/// The upstream batch always wraps the real record list in an outer list;
/// only its first element is used.
fn unwrap_batch(value: Value) -> Result<Vec<Record>, String> {
    let Value::Array(outer) = value else {
        return Err("payload is not a list".to_string());
    };

    let first = outer
        .into_iter()
        .next()
        .ok_or_else(|| "payload list is empty".to_string())?;

    let Value::Array(entries) = first else {
        return Err("first element of payload is not a list of records".to_string());
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            Value::Object(record) => Ok(record),
            other => Err(format!("entry {} is not a record: {}", i, other)),
        })
        .collect()
}

fn matches_status(record: &Record, filter_status: Option<&str>) -> bool {
    match filter_status {
        None => true,
        Some(wanted) => record.get(STATUS_FIELD).and_then(Value::as_str) == Some(wanted),
    }
}
