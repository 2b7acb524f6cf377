//! Log sources supply the raw lines handed to the extractor.

pub mod file;
pub mod http;

use crate::config::SourceConfig;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub use file::{decode_lines, FileLogSource};
pub use http::HttpLogSource;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read log file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("log endpoint returned error status {status}: {message}")]
    Status { status: u16, message: String },
}

/// Supplies log lines in chronological order, one event per line.
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn fetch_lines(&self) -> Result<Vec<String>, SourceError>;

    /// Short human-readable name used in log messages.
    fn describe(&self) -> String;
}

/// Builds the configured source.
pub fn from_config(config: &SourceConfig) -> Result<Arc<dyn LogSource>, SourceError> {
    let source: Arc<dyn LogSource> = match config {
        SourceConfig::File { path } => Arc::new(FileLogSource::new(path.clone())),
        SourceConfig::Http { url, timeout } => Arc::new(HttpLogSource::new(url.clone(), *timeout)?),
    };
    Ok(source)
}
