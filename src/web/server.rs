use axum::{routing::get, Router};
use std::future::Future;
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;

use super::api::{ask, health_check, AppState};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/ask", get(ask).post(ask))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the question API until `shutdown` resolves.
pub async fn run_server<F>(
    state: AppState,
    web_config: &WebConfig,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&web_config.listen).await?;
    tracing::info!("Web server listening on {}", web_config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Web server shutting down gracefully");
        })
        .await?;

    Ok(())
}
