//! Invitation domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::DocumentCreated;
use super::error::InvitationError;

/// Document field holding the invited address
pub const EMAIL_FIELD: &str = "email";

/// Document field holding the verification code
pub const INVITE_CODE_FIELD: &str = "invite_code";

/// A pending invitation read from a newly created document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInvitation {
    /// Document ID of the invitation
    pub id: String,
    pub email: String,
    pub invite_code: String,
}

impl PendingInvitation {
    /// Read the invitation fields out of a created document
    pub fn from_document(document: &DocumentCreated) -> Result<Self, InvitationError> {
        let path = document.path();

        let email = match document.fields.get(EMAIL_FIELD) {
            None | Some(Value::Null) => return Err(missing(&path, EMAIL_FIELD)),
            Some(Value::String(email)) => email.trim().to_string(),
            Some(other) => {
                return Err(invalid(
                    &path,
                    EMAIL_FIELD,
                    format!("expected a string, found {}", kind(other)),
                ))
            }
        };

        if email.is_empty() {
            return Err(invalid(&path, EMAIL_FIELD, "must not be empty".to_string()));
        }
        if !email.contains('@') {
            return Err(invalid(
                &path,
                EMAIL_FIELD,
                format!("'{}' is not an email address", email),
            ));
        }

        let invite_code = match document.fields.get(INVITE_CODE_FIELD) {
            None | Some(Value::Null) => return Err(missing(&path, INVITE_CODE_FIELD)),
            Some(Value::String(code)) => code.trim().to_string(),
            Some(Value::Number(code)) => code.to_string(),
            Some(other) => {
                return Err(invalid(
                    &path,
                    INVITE_CODE_FIELD,
                    format!("expected a string or number, found {}", kind(other)),
                ))
            }
        };

        if invite_code.is_empty() {
            return Err(invalid(
                &path,
                INVITE_CODE_FIELD,
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            id: document.document_id.clone(),
            email,
            invite_code,
        })
    }
}

fn missing(document: &str, field: &str) -> InvitationError {
    InvitationError::MissingField {
        document: document.to_string(),
        field: field.to_string(),
    }
}

fn invalid(document: &str, field: &str, reason: String) -> InvitationError {
    InvitationError::InvalidField {
        document: document.to_string(),
        field: field.to_string(),
        reason,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
