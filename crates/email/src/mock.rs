//! Mock Email Service Implementation
//!
//! Provides in-memory email capture for testing without external dependencies.
//! Captured verification emails can be inspected and their codes extracted
//! for trigger workflow validation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    EmailError, EmailMessage, EmailReceipt, EmailService, DEFAULT_FROM,
    DEFAULT_VERIFICATION_SUBJECT,
};

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// Whether this capture is a verification code email
    pub fn is_verification_email(&self) -> bool {
        self.message
            .metadata
            .get("email_type")
            .map(|t| t == "verification_code")
            .unwrap_or(false)
            || self
                .message
                .subject
                .to_lowercase()
                .contains("verification")
    }

    /// Extract the verification code from the email content
    pub fn extract_verification_code(&self) -> Option<String> {
        let patterns = [
            r"verification code is:\s*<b>([^<]+)</b>",
            r"verification code is:\s*(\S+)",
        ];

        let sources = [
            self.message.body_html.as_deref().unwrap_or(""),
            self.message.body_text.as_str(),
        ];

        for pattern in &patterns {
            if let Ok(re) = regex::Regex::new(pattern) {
                for source in &sources {
                    if let Some(code) = re.captures(source).and_then(|c| c.get(1)) {
                        return Some(code.as_str().to_string());
                    }
                }
            }
        }

        None
    }

    /// Invitation document ID this email was sent for
    pub fn invitation_id(&self) -> Option<&str> {
        self.message.metadata.get("invitation_id").map(String::as_str)
    }
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    email_by_recipient: Arc<Mutex<HashMap<String, Vec<CapturedEmail>>>>,
    default_from: String,
    verification_subject: String,
    enabled: bool,
    fail_with: Option<String>,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self::with_sender(
            DEFAULT_FROM.to_string(),
            DEFAULT_VERIFICATION_SUBJECT.to_string(),
        )
    }

    /// Create a mock that stamps the given sender and subject
    pub fn with_sender(default_from: String, verification_subject: String) -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            default_from,
            verification_subject,
            enabled: true,
            fail_with: None,
        }
    }

    /// Create a disabled mock email service (for testing)
    pub fn new_disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Create a mock whose every send fails like an unreachable relay
    pub fn new_failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::new()
        }
    }

    fn emails(&self) -> MutexGuard<'_, Vec<CapturedEmail>> {
        self.emails.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn by_recipient(&self) -> MutexGuard<'_, HashMap<String, Vec<CapturedEmail>>> {
        self.email_by_recipient
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get all captured emails
    pub fn get_all_emails(&self) -> Vec<CapturedEmail> {
        self.emails().clone()
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        self.by_recipient().get(email).cloned().unwrap_or_default()
    }

    /// Get the most recent verification email for a recipient
    pub fn get_latest_verification_email(&self, email: &str) -> Option<CapturedEmail> {
        self.get_emails_for_recipient(email)
            .into_iter()
            .filter(CapturedEmail::is_verification_email)
            .max_by_key(|e| e.captured_at)
    }

    /// Get the verification code from the most recent verification email
    pub fn get_code_for_email(&self, email: &str) -> Option<String> {
        self.get_latest_verification_email(email)
            .and_then(|email| email.extract_verification_code())
    }

    /// Check if a verification email was sent to a specific email address
    pub fn was_verification_sent_to(&self, email: &str) -> bool {
        self.get_code_for_email(email).is_some()
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        self.emails().len()
    }

    /// Clear all captured emails
    pub fn clear(&self) {
        self.emails().clear();
        self.by_recipient().clear();
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        if let Some(reason) = &self.fail_with {
            return Err(EmailError::Smtp(reason.clone()));
        }

        if !self.enabled {
            tracing::warn!("Mock email service disabled, skipping send");
            return Ok(EmailReceipt {
                message_id: format!("disabled-{}", Uuid::new_v4()),
                sent_at: Utc::now(),
                provider: "mock-disabled".to_string(),
                metadata: message.metadata.clone(),
            });
        }

        tracing::info!("Mock email service capturing email to: {}", message.to);

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
            metadata: message.metadata.clone(),
        };

        let captured = CapturedEmail {
            message: message.clone(),
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        };

        self.emails().push(captured.clone());
        self.by_recipient()
            .entry(message.to)
            .or_default()
            .push(captured);

        tracing::info!(
            "Email captured successfully, message ID: {}",
            receipt.message_id
        );

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        self.default_from.clone()
    }

    fn verification_subject(&self) -> String {
        self.verification_subject.clone()
    }

    fn service_name(&self) -> &'static str {
        "mock"
    }
}
