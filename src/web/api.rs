use crate::llm::{Answer, ChatModel};
use crate::report::answer_question;
use crate::source::LogSource;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Collaborators shared by every request, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn LogSource>,
    pub model: Arc<dyn ChatModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

pub async fn health_check() -> &'static str {
    "OK"
}

/// Answers a question sent as a JSON body. The body is read as plain text so
/// clients that send `text/plain` are accepted too. Answer failures still
/// return 200 with an `error` payload.
pub async fn ask(State(state): State<AppState>, body: String) -> Response {
    let request: AskRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Rejecting malformed question request");
            return (
                StatusCode::BAD_REQUEST,
                Json(Answer::error(format!("invalid request body: {}", e))),
            )
                .into_response();
        }
    };

    let answer = answer_question(state.source.as_ref(), state.model.as_ref(), &request.question).await;
    (StatusCode::OK, Json(answer)).into_response()
}
