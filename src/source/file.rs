use super::{LogSource, SourceError};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::warn;

/// Reads every line of a local log file.
#[derive(Debug, Clone)]
pub struct FileLogSource {
    path: PathBuf,
}

impl FileLogSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    async fn fetch_lines(&self) -> Result<Vec<String>, SourceError> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;

        Ok(decode_lines(&content))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Splits raw bytes into lines. Invalid UTF-8 is replaced per line so one
/// damaged line does not cost the rest of the input.
pub fn decode_lines(content: &[u8]) -> Vec<String> {
    let mut lines: Vec<&[u8]> = content.split(|&b| b == b'\n').collect();
    if lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            let text = String::from_utf8_lossy(line);
            if let std::borrow::Cow::Owned(_) = text {
                warn!(line = index + 1, "Replaced invalid UTF-8 in log line");
            }
            text.into_owned()
        })
        .collect()
}
