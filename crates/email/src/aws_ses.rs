//! AWS SES Email Service Implementation
//!
//! Hands SES the same multipart MIME document the SMTP relay sends, through
//! `SendRawEmail`. A custom endpoint (LocalStack) gets static test credentials.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_ses::config::SharedCredentialsProvider;
use aws_sdk_ses::primitives::Blob;
use aws_sdk_ses::types::RawMessage;
use aws_sdk_ses::Client as SesClient;
use chrono::Utc;

use crate::smtp::build_mime_message;
use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

const DEFAULT_REGION: &str = "us-east-1";

/// AWS SES email service implementation
pub struct SesEmailService {
    client: SesClient,
    config: EmailConfig,
}

impl SesEmailService {
    /// Create a new SES email service
    pub async fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let client = SesClient::new(&load_sdk_config(&config).await);

        match client.get_send_quota().send().await {
            Ok(_) => tracing::info!("Connected to AWS SES"),
            // LocalStack may not have SES provisioned yet
            Err(e) => tracing::warn!(error = %e, "SES quota check failed"),
        }

        Ok(Self { client, config })
    }

    /// Encode a message as the raw MIME payload `SendRawEmail` expects
    fn raw_message(message: &EmailMessage) -> Result<RawMessage, EmailError> {
        let (mime, _) = build_mime_message(message)?;

        RawMessage::builder()
            .data(Blob::new(mime.formatted()))
            .build()
            .map_err(|e| EmailError::AwsSes(format!("Failed to build raw message: {}", e)))
    }
}

async fn load_sdk_config(config: &EmailConfig) -> SdkConfig {
    let region = Region::new(
        config
            .aws_region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
    );
    let loader = aws_config::defaults(BehaviorVersion::latest()).region(region);

    let Some(endpoint_url) = config.aws_endpoint_url.as_deref() else {
        return loader.load().await;
    };

    tracing::info!(endpoint = endpoint_url, "Using custom SES endpoint");
    let credentials = Credentials::new("test", "test", None, None, "invite-mailer-localstack");
    loader
        .endpoint_url(endpoint_url)
        .credentials_provider(SharedCredentialsProvider::new(credentials))
        .load()
        .await
}

#[async_trait::async_trait]
impl EmailService for SesEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        tracing::info!("Sending email via AWS SES to: {}", message.to);

        let raw = Self::raw_message(&message)?;

        let output = self
            .client
            .send_raw_email()
            .raw_message(raw)
            .send()
            .await
            .map_err(|e| EmailError::AwsSes(format!("Failed to send email: {}", e)))?;

        // SES assigns its own Message-ID on delivery
        let message_id = output.message_id().to_string();
        tracing::debug!(message_id = %message_id, "SES accepted message");

        Ok(EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "aws-ses".to_string(),
            metadata: message.metadata,
        })
    }

    fn default_from(&self) -> String {
        self.config.default_from.clone()
    }

    fn verification_subject(&self) -> String {
        self.config.verification_subject.clone()
    }

    fn service_name(&self) -> &'static str {
        "aws-ses"
    }
}
