//! Shared configuration and error handling for Invite Mailer
//!
//! This crate provides common functionality used across the workspace:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping for the local trigger emulator
//! - Axum extractors that reject with the common error format

pub mod config;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::JsonBody;
