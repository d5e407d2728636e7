//! API layer for the invitations domain
//!
//! A local stand-in for the platform trigger: posts documents or raw
//! trigger payloads through the same handler the serverless entry point uses.

pub mod handlers;
pub mod routes;

use crate::trigger::InvitationTrigger;

pub use routes::routes;

/// State shared by the emulator routes
#[derive(Clone)]
pub struct TriggerState {
    pub trigger: InvitationTrigger,
}
