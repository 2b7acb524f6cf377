use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    #[serde(default)]
    pub web: WebConfig,
}

/// Where log lines come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A local file, one log event per line.
    File { path: PathBuf },
    /// An HTTP endpoint returning `{"events": [{"message": ...}]}`.
    Http {
        url: String,
        #[serde(with = "humantime_serde", default = "default_source_timeout")]
        timeout: Duration,
    },
}

fn default_source_timeout() -> Duration {
    Duration::from_secs(30)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Status value selected for the report.
    pub status: String,
    pub subject: String,
    /// Line placed above the table in the notification body.
    pub label: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            status: "Rejected".to_string(),
            subject: "Rejected Invoices Report".to_string(),
            label: "Rejected Invoices:".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotifyConfig {
    /// Write notifications to the log instead of delivering them.
    #[default]
    Log,
    Webhook {
        url: String,
        #[serde(with = "humantime_serde", default = "default_notify_timeout")]
        timeout: Duration,
    },
}

fn default_notify_timeout() -> Duration {
    Duration::from_secs(10)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_url")]
    pub url: String,
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(with = "humantime_serde", default = "default_llm_timeout")]
    pub timeout: Duration,
}

fn default_llm_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_llm_timeout() -> Duration {
    Duration::from_secs(300)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl WebConfig {
    /// URL of the question endpoint when reached on this listen address.
    pub fn ask_url(&self) -> String {
        format!("http://{}/api/ask", self.listen)
    }
}
