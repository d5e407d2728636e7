//! Invite Mailer application composition root
//!
//! Wires configuration, the email service, and the invitation trigger
//! together for the Lambda entry point and the local emulator.

use std::sync::Arc;

use axum::Router;
use invite_mailer_common::Config;
use invite_mailer_email::{EmailConfig, EmailServiceFactory};
use invite_mailer_invitations::{InvitationTrigger, TriggerState};

/// Build the invitation trigger from environment configuration
pub async fn create_trigger(config: &Config) -> Result<InvitationTrigger, anyhow::Error> {
    let email_config = EmailConfig::from_env()?;
    create_trigger_with(config, email_config).await
}

/// Build the invitation trigger with explicit email settings
pub async fn create_trigger_with(
    config: &Config,
    email_config: EmailConfig,
) -> Result<InvitationTrigger, anyhow::Error> {
    let email_service = EmailServiceFactory::create(email_config).await?;

    tracing::info!(
        provider = email_service.service_name(),
        collection = %config.invitations_collection,
        "Invitation trigger ready"
    );

    Ok(InvitationTrigger::new(
        Arc::from(email_service),
        config.invitations_collection.clone(),
    ))
}

/// Create the local emulator router around a trigger
pub fn create_app(trigger: InvitationTrigger) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Invite Mailer trigger emulator v0.0.1-SNAPSHOT" }),
        )
        .merge(invite_mailer_invitations::routes().with_state(TriggerState { trigger }))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
