//! Invitation domain errors

use invite_mailer_common::Error as CommonError;
use invite_mailer_email::EmailError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvitationError {
    #[error("Unsupported trigger event: {0}")]
    UnsupportedEvent(String),

    #[error("Document {document} is missing field '{field}'")]
    MissingField { document: String, field: String },

    #[error("Document {document} has invalid field '{field}': {reason}")]
    InvalidField {
        document: String,
        field: String,
        reason: String,
    },

    #[error("Email delivery failed: {0}")]
    Email(#[from] EmailError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InvitationError> for CommonError {
    fn from(err: InvitationError) -> Self {
        match err {
            InvitationError::Email(e) if e.is_delivery_failure() => {
                CommonError::Upstream(e.to_string())
            }
            InvitationError::Email(e @ EmailError::Configuration(_)) => {
                CommonError::Configuration(e.to_string())
            }
            InvitationError::Email(e) => CommonError::Validation(e.to_string()),
            InvitationError::Serialization(e) => CommonError::Serialization(e),
            other => CommonError::Validation(other.to_string()),
        }
    }
}
