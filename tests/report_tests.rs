use async_trait::async_trait;
use logsalvage::config::ReportConfig;
use logsalvage::llm::{Answer, ChatModel, ContentBlock, LlmError, Prompt};
use logsalvage::notify::{Notifier, NotifyError};
use logsalvage::report::{answer_question, compose_report, send_rejected_report, ReportError};
use logsalvage::source::{LogSource, SourceError};
use std::sync::Mutex;

struct StaticSource(Vec<String>);

impl StaticSource {
    fn new(lines: &[&str]) -> Self {
        Self(lines.iter().map(|l| l.to_string()).collect())
    }
}

#[async_trait]
impl LogSource for StaticSource {
    async fn fetch_lines(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

struct BrokenSource;

#[async_trait]
impl LogSource for BrokenSource {
    async fn fetch_lines(&self) -> Result<Vec<String>, SourceError> {
        Err(SourceError::Status {
            status: 503,
            message: "log service unavailable".to_string(),
        })
    }

    fn describe(&self) -> String {
        "broken".to_string()
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

struct RejectingNotifier;

#[async_trait]
impl Notifier for RejectingNotifier {
    async fn publish(&self, _subject: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Status {
            status: 500,
            message: "mailer down".to_string(),
        })
    }
}

struct ScriptedModel {
    reply: String,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedModel {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok(self.reply.clone())
    }
}

struct UnavailableModel;

#[async_trait]
impl ChatModel for UnavailableModel {
    async fn complete(&self, _prompt: &Prompt) -> Result<String, LlmError> {
        Err(LlmError::Status {
            status: 429,
            message: "throttled".to_string(),
        })
    }
}

const LINES: &[&str] = &[
    r#"parsed_response - [[{invoice => "INV-1", status => "Rejected"}, {invoice => "INV-2", status => "Approved"}]]"#,
    "",
    "noise without payload",
    r#"parsed_response - [[{invoice => "INV-3", status => "Rejected"}]]"#,
];

#[tokio::test]
async fn test_report_sends_only_rejected_rows() {
    let source = StaticSource::new(LINES);
    let notifier = RecordingNotifier::default();

    let summary = send_rejected_report(&source, &notifier, &ReportConfig::default())
        .await
        .unwrap();

    assert_eq!(summary.rows, 2);
    assert!(summary.error.is_none());

    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "Rejected Invoices Report");
    assert_eq!(
        sent[0].1,
        "Rejected Invoices:\n\ninvoice | status\n----------------\nINV-1 | Rejected\nINV-3 | Rejected"
    );
}

#[tokio::test]
async fn test_report_with_no_matches_says_no_data() {
    let source = StaticSource::new(&[r#"p - [[{"status":"Approved"}]]"#]);
    let summary = compose_report(&source, &ReportConfig::default()).await;

    assert_eq!(summary.rows, 0);
    assert_eq!(summary.body, "Rejected Invoices:\n\nNo data available.");
}

#[tokio::test]
async fn test_report_uses_configured_status_and_label() {
    let source = StaticSource::new(LINES);
    let settings = ReportConfig {
        status: "Approved".to_string(),
        subject: "Approved".to_string(),
        label: "Approved Invoices:".to_string(),
    };

    let summary = compose_report(&source, &settings).await;
    assert!(summary.body.starts_with("Approved Invoices:\n\n"));
    assert!(summary.body.contains("INV-2 | Approved"));
    assert!(!summary.body.contains("INV-1"));
}

#[tokio::test]
async fn test_source_failure_is_reported_in_the_notification() {
    let notifier = RecordingNotifier::default();

    let summary = send_rejected_report(&BrokenSource, &notifier, &ReportConfig::default())
        .await
        .unwrap();

    assert!(summary.error.is_some());
    let sent = notifier.sent.lock().unwrap();
    assert!(sent[0].1.contains("log service unavailable"));
}

#[tokio::test]
async fn test_render_failure_is_reported_instead_of_partial_table() {
    let source = StaticSource::new(&[
        r#"p - [[{"status":"Rejected","id":1},{"status":"Rejected"}]]"#,
    ]);
    let summary = compose_report(&source, &ReportConfig::default()).await;

    assert_eq!(summary.rows, 0);
    assert!(summary.body.contains("missing column 'id'"));
    assert!(!summary.body.contains(" | "));
}

#[tokio::test]
async fn test_delivery_failure_is_returned() {
    let source = StaticSource::new(LINES);
    let result = send_rejected_report(&source, &RejectingNotifier, &ReportConfig::default()).await;
    assert!(matches!(result, Err(ReportError::Notify(_))));
}

#[tokio::test]
async fn test_question_uses_all_records_as_context() {
    let source = StaticSource::new(LINES);
    let model = ScriptedModel::new("Two invoices were rejected.\nINV-1\nINV-3");

    let answer = answer_question(&source, &model, "Which invoices were rejected?").await;

    match answer {
        Answer::Lines(lines) => {
            assert_eq!(lines.len(), 3);
            assert_eq!(lines[&0], "Two invoices were rejected.");
            assert_eq!(lines[&2], "INV-3");
        }
        other => panic!("unexpected answer: {:?}", other),
    }

    let prompts = model.prompts.lock().unwrap();
    let ContentBlock::Text { text } = &prompts[0].messages[0].content[0];
    assert!(text.contains("INV-2 | Approved"));
    let ContentBlock::Text { text } = &prompts[0].messages[0].content[1];
    assert_eq!(text, "Question Which invoices were rejected?");
}

#[tokio::test]
async fn test_model_failure_becomes_error_answer() {
    let source = StaticSource::new(LINES);
    let answer = answer_question(&source, &UnavailableModel, "anything").await;

    match answer {
        Answer::Error { error } => {
            assert!(error.starts_with("Error generating the details:"));
            assert!(error.contains("throttled"));
        }
        other => panic!("unexpected answer: {:?}", other),
    }
}

#[tokio::test]
async fn test_source_failure_becomes_error_answer() {
    let model = ScriptedModel::new("unused");
    let answer = answer_question(&BrokenSource, &model, "anything").await;

    assert!(matches!(answer, Answer::Error { .. }));
    assert!(model.prompts.lock().unwrap().is_empty());
}
