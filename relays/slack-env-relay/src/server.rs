//! HTTP surface: health check and the slash-command endpoint.

use crate::{
    aggregate::search_environments,
    api::ApiClient,
    config::RelayConfig,
    error::RelayError,
    format::build_message,
    publish::WebhookPublisher,
    slack::SlashResponse,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    signal::unix::{SignalKind, signal},
};

/// Shared, read-only application state.
pub struct AppState {
    pub config: RelayConfig,
    pub api: ApiClient,
    pub publisher: WebhookPublisher,
}

impl AppState {
    /// Uses one HTTP client for both the partner API and the webhook.
    pub fn new(config: RelayConfig, http: reqwest::Client) -> Self {
        Self {
            config,
            api: ApiClient::new(http.clone()),
            publisher: WebhookPublisher::new(http),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check).post(slack_trigger))
        .with_state(state)
}

/// Serves until SIGTERM or Ctrl-C.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}

async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "Service is healthy.")
}

/// Error boundary around the slash-command pipeline.
async fn slack_trigger(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match handle_slash_command(&state, &body).await {
        Ok((status, reply)) => (status, Json(reply)).into_response(),
        Err(e) => {
            tracing::error!(error = ?e, "unhandled error while processing slash command");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(SlashResponse::failure())).into_response()
        }
    }
}

async fn handle_slash_command(
    state: &AppState,
    body: &[u8],
) -> Result<(StatusCode, SlashResponse), RelayError> {
    let Some(text) = command_text(body) else {
        return Ok((StatusCode::OK, SlashResponse::usage()));
    };

    let environments = search_environments(&state.api, &state.config.regions, &text).await;
    if environments.is_empty() {
        return Ok((StatusCode::OK, SlashResponse::no_results(&text)));
    }

    let message = build_message(&state.api, &state.config.channel, &environments).await;

    let Some(webhook_url) = state.config.webhook_url.as_deref() else {
        tracing::error!("SLACK_WEBHOOK_URL is not set");
        return Ok((StatusCode::INTERNAL_SERVER_ERROR, SlashResponse::misconfigured()));
    };

    state.publisher.publish(webhook_url, &message).await?;

    Ok((StatusCode::OK, SlashResponse::sent(environments.len())))
}

/// First non-empty `text` field of a URL-encoded form body.
fn command_text(body: &[u8]) -> Option<String> {
    form_urlencoded::parse(body)
        .find(|(key, value)| key == "text" && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}
