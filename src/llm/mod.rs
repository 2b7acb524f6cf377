//! Prompt construction and the model endpoint seam.

pub mod messages;

use async_trait::async_trait;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub use messages::MessagesClient;

pub const SYSTEM_INSTRUCTION: &str =
    "You are an AI assistant that can answer questions based on the provided data";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model endpoint returned error status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("API key environment variable '{0}' is not set")]
    MissingApiKey(String),

    #[error("invalid header value: {0}")]
    InvalidHeader(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

/// Everything sent to the model for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub messages: Vec<Message>,
}

/// A model that turns a prompt into a text answer. An empty string means the
/// model returned no content.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError>;
}

/// Builds the prompt carrying the rendered report as context and the user's
/// question, in that order.
pub fn build_prompt(question: &str, report: &str) -> Prompt {
    Prompt {
        system: SYSTEM_INSTRUCTION.to_string(),
        messages: vec![Message {
            role: Role::User,
            content: vec![
                ContentBlock::text(format!("Report of rejected invoices: {}", report)),
                ContentBlock::text(format!("Question {}", question)),
            ],
        }],
    }
}

/// Splits a model answer into numbered lines. Empty lines keep their slot.
pub fn split_answer(text: &str) -> BTreeMap<usize, String> {
    if text.is_empty() {
        return BTreeMap::new();
    }

    text.split('\n')
        .map(str::to_string)
        .enumerate()
        .collect()
}

/// What the question endpoint returns: numbered answer lines, or an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Error { error: String },
    Lines(BTreeMap<usize, String>),
}

impl Answer {
    pub fn error(message: impl Into<String>) -> Self {
        Answer::Error {
            error: message.into(),
        }
    }
}

// Untagged derive buffers the map and loses serde_json's string-to-integer
// key conversion, so this decodes the flat map by hand.
impl<'de> Deserialize<'de> for Answer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = BTreeMap::<String, String>::deserialize(deserializer)?;

        if map.len() == 1 {
            if let Some(error) = map.remove("error") {
                return Ok(Answer::Error { error });
            }
        }

        map.into_iter()
            .map(|(key, line)| {
                key.parse::<usize>()
                    .map(|index| (index, line))
                    .map_err(|_| de::Error::custom(format!("unexpected answer key '{}'", key)))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Answer::Lines)
    }
}
