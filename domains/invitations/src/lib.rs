//! Invitations domain: pending invitation documents and the trigger that
//! emails their verification codes

pub mod api;
pub mod domain;
pub mod trigger;

// Re-export domain types at the crate root for convenience
pub use domain::document::{decode_created_documents, DocumentCreated};
pub use domain::entities::PendingInvitation;
pub use domain::error::InvitationError;

pub use trigger::{InvitationTrigger, TriggerOutcome};

// Re-export API types
pub use api::routes;
pub use api::TriggerState;
