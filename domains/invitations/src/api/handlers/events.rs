//! Trigger emulator handlers
//!
//! - POST /v1/events - Deliver a raw trigger payload
//! - POST /v1/documents/{*document_path} - Emulate creation of one document

use axum::{
    extract::{Path, State},
    response::Json,
};
use invite_mailer_common::{Error, JsonBody};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::TriggerState;
use crate::domain::document::DocumentCreated;
use crate::trigger::TriggerOutcome;

/// Summary of one emulated trigger invocation
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub sent: usize,
    pub skipped: usize,
    pub message_ids: Vec<String>,
}

impl From<TriggerOutcome> for TriggerResponse {
    fn from(outcome: TriggerOutcome) -> Self {
        Self {
            sent: outcome.sent.len(),
            skipped: outcome.skipped,
            message_ids: outcome.sent.into_iter().map(|r| r.message_id).collect(),
        }
    }
}

/// Deliver a raw trigger payload (Firestore event, stream batch, or plain document)
pub async fn deliver_event(
    State(state): State<TriggerState>,
    JsonBody(payload): JsonBody<Value>,
) -> Result<Json<TriggerResponse>, Error> {
    let outcome = state.trigger.handle(payload).await?;
    Ok(Json(outcome.into()))
}

/// Emulate the creation of the document at `document_path` with the posted fields
pub async fn create_document(
    State(state): State<TriggerState>,
    Path(document_path): Path<String>,
    JsonBody(fields): JsonBody<Map<String, Value>>,
) -> Result<Json<TriggerResponse>, Error> {
    let (collection, document_id) = document_path
        .trim_matches('/')
        .rsplit_once('/')
        .filter(|(collection, id)| !collection.is_empty() && !id.is_empty())
        .ok_or_else(|| {
            Error::Validation(format!(
                "document path '{}' must be collection/document_id",
                document_path
            ))
        })?;

    let document = DocumentCreated {
        collection: collection.to_string(),
        document_id: document_id.to_string(),
        fields,
    };

    let outcome = state.trigger.handle_documents(vec![document]).await?;
    Ok(Json(outcome.into()))
}
