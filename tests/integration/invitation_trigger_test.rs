//! Invitation Trigger Integration Tests
//!
//! Drives the trigger end to end with realistic platform payloads and
//! validates the captured verification emails.

use invite_mailer_email::mock::MockEmailService;
use invite_mailer_email::EmailError;
use invite_mailer_invitations::{InvitationError, InvitationTrigger};
use serde_json::json;
use std::sync::Arc;

use crate::common::{firestore_created, mock_trigger, stream_record, COLLECTION};

#[test_log::test(tokio::test)]
async fn test_firestore_invitation_workflow_e2e() {
    println!("\n🚀 === INVITATION TRIGGER WORKFLOW TEST ===\n");

    // ============================================================================
    // Step 1: Setup trigger with mock email service
    // ============================================================================
    println!("📧 Step 1: Setting up trigger with mock email service...");

    let (trigger, mock) = mock_trigger();
    assert_eq!(trigger.collection(), COLLECTION);

    // ============================================================================
    // Step 2: Deliver a document creation event
    // ============================================================================
    println!("\n📝 Step 2: Delivering pending invitation creation...");

    let invitee_email = "newdev@company.com";
    let invite_code = "604218";

    let outcome = trigger
        .handle(firestore_created("inv-001", invitee_email, invite_code))
        .await
        .expect("trigger should send the verification email");

    assert_eq!(outcome.sent.len(), 1);
    assert_eq!(outcome.skipped, 0);
    println!("✅ Trigger sent {} email(s)", outcome.sent.len());

    // ============================================================================
    // Step 3: Verify captured email
    // ============================================================================
    println!("\n🔍 Step 3: Verifying captured email...");

    let email = mock
        .get_latest_verification_email(invitee_email)
        .expect("verification email should be captured");

    assert_eq!(email.message.to, invitee_email);
    assert_eq!(email.message.from, "\"Your App\" <noreply@yourapp.com>");
    assert_eq!(email.message.subject, "Your Verification Code");
    assert_eq!(
        email.message.body_html.as_deref(),
        Some("Your verification code is: <b>604218</b>")
    );
    assert_eq!(email.invitation_id(), Some("inv-001"));
    assert_eq!(email.receipt.message_id, outcome.sent[0].message_id);

    // ============================================================================
    // Step 4: Extract the code the invitee would type in
    // ============================================================================
    println!("\n🔑 Step 4: Extracting verification code...");

    assert_eq!(
        mock.get_code_for_email(invitee_email),
        Some(invite_code.to_string())
    );

    println!("\n🎉 === INVITATION TRIGGER WORKFLOW COMPLETE ===\n");
}

#[tokio::test]
async fn test_one_creation_one_send() {
    let (trigger, mock) = mock_trigger();

    for (id, email, code) in [
        ("inv-1", "a@example.com", "100001"),
        ("inv-2", "b@example.com", "100002"),
        ("inv-3", "c@example.com", "100003"),
    ] {
        trigger
            .handle(firestore_created(id, email, code))
            .await
            .unwrap();
    }

    assert_eq!(mock.email_count(), 3);
    assert_eq!(mock.get_emails_for_recipient("b@example.com").len(), 1);
    assert_eq!(
        mock.get_code_for_email("c@example.com"),
        Some("100003".to_string())
    );
}

#[tokio::test]
async fn test_redelivered_event_sends_again() {
    // The platform may retry; each delivery is one send attempt
    let (trigger, mock) = mock_trigger();
    let event = firestore_created("inv-1", "again@example.com", "555555");

    trigger.handle(event.clone()).await.unwrap();
    trigger.handle(event).await.unwrap();

    assert_eq!(mock.get_emails_for_recipient("again@example.com").len(), 2);
}

#[tokio::test]
async fn test_stream_batch_ignores_modify_and_remove() {
    let (trigger, mock) = mock_trigger();
    let payload = json!({
        "Records": [
            stream_record("INSERT", "inv-1", "first@example.com", "111111"),
            stream_record("MODIFY", "inv-0", "old@example.com", "000000"),
            stream_record("REMOVE", "inv-9", "gone@example.com", "999999"),
            stream_record("INSERT", "inv-2", "second@example.com", "222222"),
        ]
    });

    let outcome = trigger.handle(payload).await.unwrap();

    assert_eq!(outcome.sent.len(), 2);
    assert_eq!(mock.email_count(), 2);
    assert!(mock.was_verification_sent_to("first@example.com"));
    assert!(mock.was_verification_sent_to("second@example.com"));
    assert!(!mock.was_verification_sent_to("old@example.com"));
    assert!(!mock.was_verification_sent_to("gone@example.com"));
}

#[tokio::test]
async fn test_stream_batch_stops_at_first_failure() {
    let (trigger, mock) = mock_trigger();
    let mut broken = stream_record("INSERT", "inv-2", "second@example.com", "222222");
    broken["dynamodb"]["NewImage"]
        .as_object_mut()
        .unwrap()
        .remove("invite_code");

    let payload = json!({
        "Records": [
            stream_record("INSERT", "inv-1", "first@example.com", "111111"),
            broken,
            stream_record("INSERT", "inv-3", "third@example.com", "333333"),
        ]
    });

    let result = trigger.handle(payload).await;

    assert!(matches!(
        result,
        Err(InvitationError::MissingField { ref document, ref field })
            if document == "pending_invitations/inv-2" && field == "invite_code"
    ));
    assert!(mock.was_verification_sent_to("first@example.com"));
    assert!(!mock.was_verification_sent_to("third@example.com"));
}

#[tokio::test]
async fn test_relay_outage_surfaces_to_platform() {
    let trigger = InvitationTrigger::new(
        Arc::new(MockEmailService::new_failing("421 service not available")),
        COLLECTION,
    );

    let result = trigger
        .handle(firestore_created("inv-1", "invitee@example.com", "123456"))
        .await;

    match result {
        Err(InvitationError::Email(EmailError::Smtp(reason))) => {
            assert!(reason.contains("421"));
        }
        other => panic!("expected SMTP failure, got {:?}", other.map(|o| o.sent.len())),
    }
}

mod common;
