//! Delivery of report notifications.

pub mod webhook;

use crate::config::NotifyConfig;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub use webhook::WebhookNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("notification endpoint returned error status {status}: {message}")]
    Status { status: u16, message: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Writes notifications to the process log instead of delivering them.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(subject = %subject, "Notification (not delivered)\n{}", body);
        Ok(())
    }
}

pub fn from_config(config: &NotifyConfig) -> Result<Arc<dyn Notifier>, NotifyError> {
    let notifier: Arc<dyn Notifier> = match config {
        NotifyConfig::Log => Arc::new(LogNotifier),
        NotifyConfig::Webhook { url, timeout } => {
            Arc::new(WebhookNotifier::new(url.clone(), *timeout)?)
        }
    };
    Ok(notifier)
}
