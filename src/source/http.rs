use super::{LogSource, SourceError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Fetches a log-events document over HTTP.
#[derive(Debug)]
pub struct HttpLogSource {
    url: String,
    client: reqwest::Client,
}

/// Response shape of the log endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEventsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<LogEvent>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// `null` and a missing field both read as an empty line.
    #[serde(default)]
    pub message: Option<String>,
}

impl HttpLogSource {
    pub fn new(url: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl LogSource for HttpLogSource {
    async fn fetch_lines(&self) -> Result<Vec<String>, SourceError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body: LogEventsResponse = response.json().await?;
        match body.events {
            Some(events) => Ok(events.into_iter().map(|event| event.message.unwrap_or_default()).collect()),
            None => {
                warn!(url = %self.url, "No events found in the response");
                Ok(Vec::new())
            }
        }
    }

    fn describe(&self) -> String {
        format!("endpoint {}", self.url)
    }
}
