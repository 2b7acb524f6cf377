//! Terminal chat front-end for the question service.

use crate::llm::Answer;
use crate::web::AskRequest;
use console::style;
use dialoguer::Input;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Error: Unable to get response from API (status {0})")]
    Status(u16),
}

/// Posts questions to a running question service.
#[derive(Debug)]
pub struct ChatClient {
    url: String,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(url: String, timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends the question as a `text/plain` body holding a JSON document.
    pub async fn ask(&self, question: &str) -> Result<Answer, ChatError> {
        let body = serde_json::to_string(&AskRequest {
            question: question.to_string(),
        })?;

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status().as_u16()));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Lines worth showing: anything with content left after removing ASCII
/// punctuation.
pub fn displayable_lines(answer: &Answer) -> Vec<&str> {
    match answer {
        Answer::Lines(lines) => lines
            .values()
            .map(String::as_str)
            .filter(|line| has_content(line))
            .collect(),
        Answer::Error { error } => vec![error.as_str()],
    }
}

fn has_content(line: &str) -> bool {
    line.chars().any(|c| !c.is_ascii_punctuation())
}

pub async fn run(url: String, timeout: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let client = ChatClient::new(url, timeout)?;

    println!("{}", style("Invoice chat").bold().cyan());
    println!("Asking {} (empty line or 'exit' to quit)", client.url());

    loop {
        let question: String = Input::new()
            .with_prompt(style("you").green().to_string())
            .allow_empty(true)
            .interact_text()?;

        let question = question.trim();
        if question.is_empty() || question == "exit" || question == "quit" {
            break;
        }

        match client.ask(question).await {
            Ok(answer) => {
                for line in displayable_lines(&answer) {
                    println!("{} {}", style("assistant>").cyan(), line);
                }
            }
            Err(e) => eprintln!("{} {}", style("error>").red(), e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::split_answer;

    #[test]
    fn test_punctuation_only_lines_are_hidden() {
        let answer = Answer::Lines(split_answer("Two invoices were rejected.\n\n---\n- INV-1"));
        assert_eq!(
            displayable_lines(&answer),
            vec!["Two invoices were rejected.", "- INV-1"]
        );
    }

    #[test]
    fn test_error_answer_is_shown() {
        let answer = Answer::error("Error generating the details: boom");
        assert_eq!(
            displayable_lines(&answer),
            vec!["Error generating the details: boom"]
        );
    }

    #[test]
    fn test_whitespace_counts_as_content() {
        // Only punctuation is stripped before the emptiness check.
        assert!(has_content(" "));
        assert!(!has_content("..."));
    }
}
