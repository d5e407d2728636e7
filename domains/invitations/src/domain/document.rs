//! Document creation events
//!
//! Normalizes the change-trigger payloads a document database hands to a
//! function into flat [`DocumentCreated`] values. Three shapes are accepted:
//!
//! - Firestore document events (`value` / `oldValue` with typed fields)
//! - DynamoDB stream batches (`aws_lambda_events` DynamoDB events)
//! - Plain documents as posted to the local emulator
//!
//! Only creations are returned; updates and deletes decode to nothing.

use aws_lambda_events::event::dynamodb::{self, EventRecord};
use serde::{Deserialize, Serialize};
use serde_dynamo::Item;
use serde_json::{Map, Value};

use super::error::InvitationError;

/// A newly created document, with its fields flattened to plain JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentCreated {
    /// Collection path, e.g. `pending_invitations` or `tenants/acme/pending_invitations`
    pub collection: String,
    pub document_id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl DocumentCreated {
    /// Full document path, `collection/document_id`
    pub fn path(&self) -> String {
        format!("{}/{}", self.collection, self.document_id)
    }

    /// Whether the document belongs to `collection` (slashes at either end are ignored)
    pub fn in_collection(&self, collection: &str) -> bool {
        self.collection.trim_matches('/') == collection.trim_matches('/')
    }
}

/// Decode a trigger payload into the documents it reports as created
pub fn decode_created_documents(payload: Value) -> Result<Vec<DocumentCreated>, InvitationError> {
    let Value::Object(object) = payload else {
        return Err(InvitationError::UnsupportedEvent(
            "payload is not a JSON object".to_string(),
        ));
    };

    if object.contains_key("Records") {
        let batch: dynamodb::Event = serde_json::from_value(Value::Object(object))?;
        return batch
            .records
            .into_iter()
            .filter(|record| record.event_name == "INSERT")
            .map(stream_insert)
            .collect();
    }

    if object.contains_key("value") || object.contains_key("oldValue") {
        let event: FirestoreEvent = serde_json::from_value(Value::Object(object))?;
        return firestore_event(event).map(|doc| doc.into_iter().collect());
    }

    if object.contains_key("collection") && object.contains_key("document_id") {
        let document: DocumentCreated = serde_json::from_value(Value::Object(object))?;
        return Ok(vec![document]);
    }

    Err(InvitationError::UnsupportedEvent(
        "expected a Firestore document event, a DynamoDB stream batch, or a plain document"
            .to_string(),
    ))
}

// Firestore

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreEvent {
    #[serde(default)]
    value: Option<FirestoreDocument>,
    #[serde(default)]
    old_value: Option<FirestoreDocument>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

fn firestore_event(event: FirestoreEvent) -> Result<Option<DocumentCreated>, InvitationError> {
    let Some(document) = event.value else {
        // Deletion
        return Ok(None);
    };
    if event.old_value.is_some_and(|old| !old.name.is_empty()) {
        // Update
        return Ok(None);
    }

    let (collection, document_id) = split_firestore_name(&document.name)?;

    let fields = document
        .fields
        .into_iter()
        .map(|(name, value)| (name, flatten_firestore_value(value)))
        .collect();

    Ok(Some(DocumentCreated {
        collection,
        document_id,
        fields,
    }))
}

/// Split `projects/p/databases/d/documents/a/b/c/d` into (`a/b/c`, `d`)
fn split_firestore_name(name: &str) -> Result<(String, String), InvitationError> {
    let path = match name.split_once("/documents/") {
        Some((_, path)) => path,
        None => name,
    };

    match path.trim_matches('/').rsplit_once('/') {
        Some((collection, id)) if !collection.is_empty() && !id.is_empty() => {
            Ok((collection.to_string(), id.to_string()))
        }
        _ => Err(InvitationError::UnsupportedEvent(format!(
            "document name '{}' has no collection",
            name
        ))),
    }
}

fn flatten_firestore_value(value: Value) -> Value {
    let Value::Object(mut typed) = value else {
        return value;
    };
    if typed.len() != 1 {
        return Value::Object(typed);
    }

    if let Some(v) = typed.remove("stringValue") {
        return v;
    }
    if let Some(v) = typed.remove("integerValue") {
        // Firestore encodes 64-bit integers as strings in JSON
        if let Some(n) = v.as_str().and_then(|s| s.parse::<i64>().ok()) {
            return Value::from(n);
        }
        return v;
    }
    if let Some(v) = typed.remove("doubleValue") {
        return v;
    }
    if let Some(v) = typed.remove("booleanValue") {
        return v;
    }
    if typed.remove("nullValue").is_some() {
        return Value::Null;
    }
    if let Some(v) = typed.remove("timestampValue") {
        return v;
    }

    Value::Object(typed)
}

// DynamoDB streams

fn stream_insert(record: EventRecord) -> Result<DocumentCreated, InvitationError> {
    let collection = record
        .event_source_arn
        .as_deref()
        .and_then(table_name_from_arn)
        .ok_or_else(|| {
            InvitationError::UnsupportedEvent(
                "stream record has no table in eventSourceARN".to_string(),
            )
        })?;

    // Records do not carry the key schema; the attribute whose name sorts first wins
    let document_id = item_to_json(record.change.keys)?
        .into_iter()
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, value)| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .ok_or_else(|| {
            InvitationError::UnsupportedEvent("stream record has no key attributes".to_string())
        })?;

    Ok(DocumentCreated {
        collection,
        document_id,
        fields: item_to_json(record.change.new_image)?,
    })
}

fn item_to_json(item: Item) -> Result<Map<String, Value>, InvitationError> {
    serde_dynamo::from_item(item).map_err(|e| {
        InvitationError::UnsupportedEvent(format!("stream record item is not decodable: {}", e))
    })
}

/// `arn:aws:dynamodb:region:account:table/<name>/stream/<label>` -> `<name>`
fn table_name_from_arn(arn: &str) -> Option<String> {
    let (_, resource) = arn.split_once(":table/")?;
    let name = resource.split('/').next()?;
    (!name.is_empty()).then(|| name.to_string())
}
