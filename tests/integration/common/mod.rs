//! Common test utilities and fixtures for integration tests
//!
//! Provides trigger payload fixtures in each supported event shape and a
//! trigger wired to the mock email service.

use std::sync::Arc;

use invite_mailer_email::mock::MockEmailService;
use invite_mailer_invitations::InvitationTrigger;
use serde_json::{json, Value};

pub const COLLECTION: &str = "pending_invitations";

/// Trigger backed by a capturing mock mailer
#[allow(dead_code)]
pub fn mock_trigger() -> (InvitationTrigger, MockEmailService) {
    let mock = MockEmailService::new();
    let trigger = InvitationTrigger::new(Arc::new(mock.clone()), COLLECTION);
    (trigger, mock)
}

/// Firestore `document.create` event for a pending invitation
#[allow(dead_code)]
pub fn firestore_created(invite_id: &str, email: &str, code: &str) -> Value {
    json!({
        "value": {
            "name": format!(
                "projects/invite-mailer-test/databases/(default)/documents/{}/{}",
                COLLECTION, invite_id
            ),
            "fields": {
                "email": { "stringValue": email },
                "invite_code": { "stringValue": code }
            },
            "createTime": "2026-10-18T09:30:00.000000Z",
            "updateTime": "2026-10-18T09:30:00.000000Z"
        },
        "updateMask": {}
    })
}

/// DynamoDB stream record for the pending invitations table
#[allow(dead_code)]
pub fn stream_record(event_name: &str, invite_id: &str, email: &str, code: &str) -> Value {
    json!({
        "eventID": format!("evt-{}", invite_id),
        "eventName": event_name,
        "eventVersion": "1.1",
        "eventSource": "aws:dynamodb",
        "awsRegion": "us-east-1",
        "eventSourceARN": format!(
            "arn:aws:dynamodb:us-east-1:123456789012:table/{}/stream/2026-10-18T00:00:00.000",
            COLLECTION
        ),
        "dynamodb": {
            "ApproximateCreationDateTime": 1760779800,
            "Keys": { "invite_id": { "S": invite_id } },
            "NewImage": {
                "invite_id": { "S": invite_id },
                "email": { "S": email },
                "invite_code": { "S": code }
            },
            "SequenceNumber": format!("1000000000000000{}", invite_id.len()),
            "SizeBytes": 112,
            "StreamViewType": "NEW_IMAGE"
        }
    })
}
