//! Invite Mailer - AWS Lambda Runtime
//!
//! Invoked by the document database's change trigger. A failed send fails
//! the invocation so the platform retries the event.

use invite_mailer_common::Config;
use invite_mailer_invitations::InvitationTrigger;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::{json, Value};
use tracing::{error, info};

async fn send_invite_email(
    trigger: &InvitationTrigger,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    let request_id = event.context.request_id.clone();

    let outcome = trigger.handle(event.payload).await.map_err(|e| {
        error!(request_id = %request_id, error = %e, "Invitation trigger failed");
        Error::from(e.to_string())
    })?;

    info!(
        request_id = %request_id,
        sent = outcome.sent.len(),
        skipped = outcome.skipped,
        "Invitation trigger completed"
    );

    Ok(json!({
        "sent": outcome.sent.len(),
        "skipped": outcome.skipped,
        "message_ids": outcome
            .sent
            .iter()
            .map(|receipt| receipt.message_id.as_str())
            .collect::<Vec<_>>(),
    }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .without_time()
        .init();

    info!("Initializing Invite Mailer Lambda");

    let config = Config::from_env().map_err(|e| Error::from(format!("Config error: {}", e)))?;

    let trigger = invite_mailer_app::create_trigger(&config)
        .await
        .map_err(|e| Error::from(format!("Trigger initialization error: {}", e)))?;

    info!("Invite Mailer Lambda ready to handle document events");

    let trigger = &trigger;
    run(service_fn(move |event: LambdaEvent<Value>| async move {
        send_invite_email(trigger, event).await
    }))
    .await
}
