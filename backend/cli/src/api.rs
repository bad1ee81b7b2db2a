use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};

use hotelbot_search::ReplyMode;

/// Shared application state for API handlers.
pub struct AppState {
    pub reply_mode: ReplyMode,
}

/// Build the Axum router: the health endpoint plus the webhook router.
pub fn build_router(state: Arc<AppState>, line_router: Router) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .with_state(state)
        .merge(line_router)
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "hotelbot",
        "version": env!("CARGO_PKG_VERSION"),
        "reply_mode": state.reply_mode.as_str(),
    }))
}
