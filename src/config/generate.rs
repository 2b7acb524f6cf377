pub fn generate_starter_config() -> String {
    r#"# =============================================================================
# LOGSALVAGE CONFIGURATION
# =============================================================================
# Recovers invoice records from log lines of the form
#
#   <prefix> - [[{status => Rejected, id => 42}, ...]]
#
# and republishes them as a report notification or as context for questions.
#
# Config file locations (in order of precedence):
#   1. Path specified via --config argument
#   2. ~/.config/logsalvage/config.yml
#   3. /etc/logsalvage/config.yml
#
# Values may reference environment variables with $env{<NAME>}.

# =============================================================================
# SOURCE (required)
# =============================================================================
# 'file' reads one log event per line from a local file.
# 'http' fetches {"events": [{"message": "..."}]} from an endpoint.

source:
  type: file
  path: /var/log/invoices/standardised.log
  # type: http
  # url: http://127.0.0.1:9000/events
  # timeout: 30s

# =============================================================================
# REPORT (optional)
# =============================================================================
# Which status the report selects and how the notification is titled.

report:
  status: Rejected
  subject: Rejected Invoices Report
  label: "Rejected Invoices:"

# =============================================================================
# NOTIFY (optional, defaults to 'log')
# =============================================================================
# 'log' writes the notification to the process log.
# 'webhook' POSTs {"subject", "message", "sent_at"} as JSON.

notify:
  type: log
  # type: webhook
  # url: https://hooks.example.com/invoices
  # timeout: 10s

# =============================================================================
# LLM (optional, required by 'ask' and 'serve')
# =============================================================================
# Messages-style endpoint used to answer questions about the recovered records.
# The API key is read from the environment variable named in api_key_env.

llm:
  url: https://api.anthropic.com/v1/messages
  model: claude-3-5-sonnet-20240620
  max_tokens: 1000
  api_key_env: ANTHROPIC_API_KEY
  api_version: "2023-06-01"
  timeout: 300s

# =============================================================================
# WEB (optional)
# =============================================================================
# Address the question service listens on.

web:
  listen: 127.0.0.1:8080
"#
    .to_string()
}
