//! Route definitions for the trigger emulator

use axum::{routing::post, Router};

use super::handlers::events;
use super::TriggerState;

/// Create trigger emulator routes
pub fn routes() -> Router<TriggerState> {
    Router::new()
        .route("/v1/events", post(events::deliver_event))
        .route(
            "/v1/documents/{*document_path}",
            post(events::create_document),
        )
}
