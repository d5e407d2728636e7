//! Domain layer for invitations
//!
//! Contains document event decoding, the pending invitation entity, and
//! the domain error type.

pub mod document;
pub mod entities;
pub mod error;
