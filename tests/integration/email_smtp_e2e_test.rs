//! SMTP Relay Email Service E2E Tests
//!
//! Sends a real verification email through an SMTP relay. Point
//! `SMTP_TEST_HOST` at a local catcher (e.g. Mailpit with
//! `MP_SMTP_AUTH_ACCEPT_ANY=1`) to run; otherwise the tests skip.

use invite_mailer_email::{EmailConfig, EmailServiceFactory, SmtpSettings, SmtpTls};

/// Relay host under test, if one is configured
fn smtp_test_host() -> Option<String> {
    std::env::var("SMTP_TEST_HOST").ok().filter(|h| !h.is_empty())
}

fn create_relay_email_config(host: String) -> EmailConfig {
    let port = std::env::var("SMTP_TEST_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(1025);

    EmailConfig {
        provider: "smtp".to_string(),
        smtp: SmtpSettings {
            service: None,
            host: Some(host),
            port: Some(port),
            tls: Some(SmtpTls::None),
            username: Some("e2e@yourapp.com".to_string()),
            password: Some("e2e-password".to_string()),
        },
        ..EmailConfig::default()
    }
}

#[tokio::test]
async fn test_smtp_relay_sends_verification_code() {
    println!("\n🧪 Testing SMTP relay delivery...");

    let Some(host) = smtp_test_host() else {
        println!("⏭️ Skipping test: SMTP_TEST_HOST not set");
        return;
    };

    let email_service = EmailServiceFactory::create(create_relay_email_config(host))
        .await
        .expect("Failed to create email service");

    assert_eq!(email_service.service_name(), "smtp");

    let receipt = email_service
        .send_verification_code("e2e-invite", "invitee@example.com", "246810")
        .await
        .expect("relay should accept the verification email");

    assert_eq!(receipt.provider, "smtp");
    assert!(receipt.message_id.ends_with("@yourapp.com>"));
    println!("✅ Relay accepted message {}", receipt.message_id);
}
