//! LINE adapter: receives webhook events from the LINE Messaging API.
//! Replies via the LINE Reply API.

use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use tracing::{info, warn};

use crate::dispatch::QueryDispatcher;
use crate::line_receive::{SIGNATURE_HEADER, WebhookError, decode_events, validate_signature};

#[derive(Clone)]
pub struct LineConfig {
    pub channel_secret: String,
    pub webhook_path: String,
}

pub struct LineAdapter {
    config: LineConfig,
    dispatcher: Arc<QueryDispatcher>,
}

#[derive(Clone)]
struct AppState {
    channel_secret: Arc<str>,
    dispatcher: Arc<QueryDispatcher>,
}

impl LineAdapter {
    pub fn new(config: LineConfig, dispatcher: QueryDispatcher) -> Self {
        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn webhook_path(&self) -> &str {
        &self.config.webhook_path
    }

    pub fn build_router(&self) -> Router {
        let state = AppState {
            channel_secret: Arc::from(self.config.channel_secret.as_str()),
            dispatcher: Arc::clone(&self.dispatcher),
        };
        Router::new()
            .route(&self.config.webhook_path, post(webhook_handler))
            .with_state(state)
    }
}

/// Validate, decode, then handle every event in order before acknowledging.
async fn webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !validate_signature(&body, signature, &state.channel_secret) {
        warn!("[LINE] Invalid signature, rejecting webhook");
        return Err(WebhookError::SignatureInvalid);
    }

    let events = decode_events(&body).inspect_err(|e| {
        warn!(error = %e, "[LINE] Failed to decode webhook body");
    })?;
    info!(events = events.len(), "[LINE] Webhook accepted");

    for event in &events {
        state.dispatcher.dispatch(event).await;
    }
    Ok(StatusCode::OK)
}
