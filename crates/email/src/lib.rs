//! Invite Mailer Email Service
//!
//! Provides email functionality for the invitation trigger with support for:
//! - SMTP relay delivery (Gmail and other hosted relays) for production
//! - AWS SES integration as an alternative provider
//! - Mock email service for testing and development
//! - Verification code email content

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aws_ses;
pub mod content;
pub mod mock;
pub mod smtp;

pub use smtp::{SmtpSettings, SmtpTls};

/// Sender used when `FROM_EMAIL` is not configured
pub const DEFAULT_FROM: &str = "\"Your App\" <noreply@yourapp.com>";

/// Subject used when `EMAIL_SUBJECT` is not configured
pub const DEFAULT_VERIFICATION_SUBJECT: &str = "Your Verification Code";

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("AWS SES error: {0}")]
    AwsSes(String),
}

impl EmailError {
    /// Whether the failure happened while talking to the delivery provider
    pub fn is_delivery_failure(&self) -> bool {
        matches!(self, EmailError::Smtp(_) | EmailError::AwsSes(_))
    }
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    /// Create a new email message
    pub fn new(to: String, from: String, subject: String, body_text: String) -> Self {
        Self {
            to,
            from,
            reply_to: None,
            subject,
            body_text,
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    /// Add HTML body content
    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    /// Add reply-to address
    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Add metadata for tracking
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

/// Email delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub metadata: HashMap<String, String>,
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email service provider (smtp, ses, mock)
    pub provider: String,
    /// Enable email sending (can disable for testing)
    pub enabled: bool,
    /// Default from address
    pub default_from: String,
    /// Subject line of the verification email
    pub verification_subject: String,
    /// SMTP relay settings
    pub smtp: SmtpSettings,
    /// AWS region for SES
    pub aws_region: Option<String>,
    /// AWS endpoint URL (for LocalStack)
    pub aws_endpoint_url: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: "smtp".to_string(),
            enabled: true,
            default_from: DEFAULT_FROM.to_string(),
            verification_subject: DEFAULT_VERIFICATION_SUBJECT.to_string(),
            smtp: SmtpSettings::default(),
            aws_region: None,
            aws_endpoint_url: None,
        }
    }
}

impl EmailConfig {
    /// Create email config from environment variables
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "smtp".to_string());

        let enabled = std::env::var("EMAIL_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let default_from = std::env::var("FROM_EMAIL").unwrap_or_else(|_| DEFAULT_FROM.to_string());

        let verification_subject = std::env::var("EMAIL_SUBJECT")
            .unwrap_or_else(|_| DEFAULT_VERIFICATION_SUBJECT.to_string());

        let smtp = SmtpSettings::from_env()?;

        let aws_region = std::env::var("AWS_REGION").ok();
        let aws_endpoint_url = std::env::var("AWS_ENDPOINT_URL").ok();

        Ok(Self {
            provider,
            enabled,
            default_from,
            verification_subject,
            smtp,
            aws_region,
            aws_endpoint_url,
        })
    }
}

/// Email service trait for different implementations
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email message
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Return the default "from" address for outgoing emails
    fn default_from(&self) -> String;

    /// Return the subject line used for verification emails
    fn verification_subject(&self) -> String {
        DEFAULT_VERIFICATION_SUBJECT.to_string()
    }

    /// Short provider name for logs
    fn service_name(&self) -> &'static str;

    /// Send the verification code for a pending invitation
    async fn send_verification_code(
        &self,
        invitation_id: &str,
        recipient_email: &str,
        code: &str,
    ) -> Result<EmailReceipt, EmailError> {
        let message = EmailMessage::new(
            recipient_email.to_string(),
            self.default_from(),
            self.verification_subject(),
            content::verification_code_text(code),
        )
        .with_html(content::verification_code_html(code))
        .with_metadata("email_type".to_string(), "verification_code".to_string())
        .with_metadata("invitation_id".to_string(), invitation_id.to_string());

        self.send_email(message).await
    }
}

/// Email service factory
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Create email service based on configuration
    pub async fn create(config: EmailConfig) -> Result<Box<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email service disabled, using mock implementation");
            return Ok(Box::new(mock::MockEmailService::with_sender(
                config.default_from,
                config.verification_subject,
            )));
        }

        match config.provider.as_str() {
            "smtp" => {
                tracing::info!("Creating SMTP relay email service");
                let smtp_service = smtp::SmtpEmailService::new(config)?;
                Ok(Box::new(smtp_service))
            }
            "ses" | "aws-ses" => {
                tracing::info!("Creating AWS SES email service");
                let ses_service = aws_ses::SesEmailService::new(config).await?;
                Ok(Box::new(ses_service))
            }
            "mock" => {
                tracing::info!("Creating mock email service");
                Ok(Box::new(mock::MockEmailService::with_sender(
                    config.default_from,
                    config.verification_subject,
                )))
            }
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: smtp, ses, mock",
                provider
            ))),
        }
    }
}
