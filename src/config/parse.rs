use super::types::*;
use crate::config::{expand_env_vars, expand_tilde, ENV_VAR_PATTERN};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let yaml_string = fs::read_to_string(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    parse_config(&yaml_string).map_err(|e| match e {
        ConfigError::YamlParse(e) => ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("in file '{}': {}", path.display(), e),
        )),
        other => other,
    })
}

/// Parse and validate a config document that has not been env-expanded yet.
pub fn parse_config(yaml_string: &str) -> Result<Config, ConfigError> {
    let yaml_string = expand_env_vars(yaml_string);

    check_unexpanded_vars(&yaml_string)?;

    let mut config: Config = serde_yaml::from_str(&yaml_string)?;

    expand_paths(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Checks for unexpanded environment variables and returns a helpful error
fn check_unexpanded_vars(yaml_string: &str) -> Result<(), ConfigError> {
    let mut unexpanded_vars: Vec<&str> = ENV_VAR_PATTERN
        .captures_iter(yaml_string)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .collect();

    if unexpanded_vars.is_empty() {
        return Ok(());
    }

    unexpanded_vars.sort();
    unexpanded_vars.dedup();

    let error_msg = if unexpanded_vars.len() == 1 {
        format!(
            "Environment variable $env{{{0}}} is not set.\n\
             \n\
             To fix this, either:\n\
             1. Set the environment variable: export {0}=...\n\
             2. Replace $env{{{0}}} in the config file with an actual value",
            unexpanded_vars[0]
        )
    } else {
        format!(
            "Environment variables are not set: {}\n\
             \n\
             To fix this, either:\n\
             1. Set the environment variables\n\
             2. Replace the variables in the config file with actual values",
            unexpanded_vars.join(", ")
        )
    };

    Err(ConfigError::Validation(error_msg))
}

fn expand_paths(config: &mut Config) {
    if let SourceConfig::File { path } = &mut config.source {
        *path = expand_tilde(path);
    }
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    match &config.source {
        SourceConfig::File { path } => {
            if path.as_os_str().is_empty() {
                errors.push("source.path cannot be empty".to_string());
            }
        }
        SourceConfig::Http { url, .. } => validate_url("source.url", url, &mut errors),
    }

    if config.report.status.is_empty() {
        errors.push("report.status cannot be empty".to_string());
    }
    if config.report.subject.is_empty() {
        errors.push("report.subject cannot be empty".to_string());
    }

    if let NotifyConfig::Webhook { url, .. } = &config.notify {
        validate_url("notify.url", url, &mut errors);
    }

    if let Some(llm) = &config.llm {
        validate_url("llm.url", &llm.url, &mut errors);
        if llm.model.is_empty() {
            errors.push("llm.model cannot be empty".to_string());
        }
        if llm.max_tokens == 0 {
            errors.push("llm.max_tokens must be greater than 0".to_string());
        }
        if llm.api_key_env.is_empty() {
            errors.push("llm.api_key_env cannot be empty".to_string());
        }
    }

    if config.web.listen.parse::<SocketAddr>().is_err() {
        errors.push(format!(
            "web.listen '{}' is not a valid socket address (expected host:port)",
            config.web.listen
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    if url.is_empty() {
        errors.push(format!("{} cannot be empty", field));
    } else if !url.starts_with("http://") && !url.starts_with("https://") {
        errors.push(format!(
            "{} '{}' must start with http:// or https://",
            field, url
        ));
    }
}
