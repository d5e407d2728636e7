//! Document-creation trigger
//!
//! One created pending invitation produces one verification email. Errors
//! are returned to the caller so the hosting platform can retry or report.

use std::sync::Arc;

use invite_mailer_email::{EmailReceipt, EmailService};
use serde_json::Value;

use crate::domain::document::{decode_created_documents, DocumentCreated};
use crate::domain::entities::PendingInvitation;
use crate::domain::error::InvitationError;

/// Result of handling one trigger payload
#[derive(Debug, Default)]
pub struct TriggerOutcome {
    /// One receipt per verification email sent
    pub sent: Vec<EmailReceipt>,
    /// Created documents outside the watched collection
    pub skipped: usize,
}

/// Sends verification emails for newly created pending invitations
#[derive(Clone)]
pub struct InvitationTrigger {
    email: Arc<dyn EmailService>,
    collection: String,
}

impl InvitationTrigger {
    pub fn new(email: Arc<dyn EmailService>, collection: impl Into<String>) -> Self {
        Self {
            email,
            collection: collection.into(),
        }
    }

    /// Collection path this trigger watches
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Handle a raw trigger payload
    pub async fn handle(&self, payload: Value) -> Result<TriggerOutcome, InvitationError> {
        let documents = decode_created_documents(payload)?;
        self.handle_documents(documents).await
    }

    /// Handle already decoded document creations, in order
    pub async fn handle_documents(
        &self,
        documents: Vec<DocumentCreated>,
    ) -> Result<TriggerOutcome, InvitationError> {
        let mut outcome = TriggerOutcome::default();

        for document in documents {
            if !document.in_collection(&self.collection) {
                tracing::debug!(
                    document = %document.path(),
                    watched = %self.collection,
                    "Ignoring document outside the invitations collection"
                );
                outcome.skipped += 1;
                continue;
            }

            let invitation = PendingInvitation::from_document(&document)?;
            let receipt = self.send_invite_email(&invitation).await?;
            outcome.sent.push(receipt);
        }

        Ok(outcome)
    }

    /// Send the verification code of one pending invitation
    pub async fn send_invite_email(
        &self,
        invitation: &PendingInvitation,
    ) -> Result<EmailReceipt, InvitationError> {
        let receipt = self
            .email
            .send_verification_code(&invitation.id, &invitation.email, &invitation.invite_code)
            .await
            .map_err(|e| {
                tracing::error!(
                    invitation_id = %invitation.id,
                    provider = self.email.service_name(),
                    error = %e,
                    "Failed to send verification email"
                );
                e
            })?;

        tracing::info!(
            invitation_id = %invitation.id,
            message_id = %receipt.message_id,
            "Email sent to: {}",
            invitation.email
        );

        Ok(receipt)
    }
}
