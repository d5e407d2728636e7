//! SMTP Relay Email Service Implementation
//!
//! Delivers email through a hosted SMTP relay (Gmail by default) using an
//! authenticated, pooled async transport.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use uuid::Uuid;

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

/// Connection security for the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpTls {
    /// Implicit TLS from the first byte (SMTPS)
    Tls,
    /// Plain connection upgraded with STARTTLS
    StartTls,
    /// No encryption; only for local relays such as Mailpit
    None,
}

impl SmtpTls {
    fn default_port(self) -> u16 {
        match self {
            SmtpTls::Tls => 465,
            SmtpTls::StartTls => 587,
            SmtpTls::None => 25,
        }
    }
}

impl FromStr for SmtpTls {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tls" | "ssl" | "smtps" => Ok(SmtpTls::Tls),
            "starttls" => Ok(SmtpTls::StartTls),
            "none" | "plain" => Ok(SmtpTls::None),
            other => Err(EmailError::Configuration(format!(
                "Unknown SMTP_TLS mode: {}. Supported modes: tls, starttls, none",
                other
            ))),
        }
    }
}

/// SMTP relay settings
#[derive(Clone)]
pub struct SmtpSettings {
    /// Well-known relay name (gmail, outlook, sendgrid)
    pub service: Option<String>,
    /// Explicit relay host, takes precedence over `service`
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<SmtpTls>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("service", &self.service)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            service: Some("gmail".to_string()),
            host: None,
            port: None,
            tls: None,
            username: None,
            password: None,
        }
    }
}

impl SmtpSettings {
    /// Load relay settings from `SMTP_*` environment variables
    pub fn from_env() -> Result<Self, EmailError> {
        let port = std::env::var("SMTP_PORT")
            .ok()
            .map(|raw| {
                raw.parse::<u16>().map_err(|_| {
                    EmailError::Configuration(format!("SMTP_PORT is not a valid port: {}", raw))
                })
            })
            .transpose()?;

        let tls = std::env::var("SMTP_TLS")
            .ok()
            .map(|raw| raw.parse::<SmtpTls>())
            .transpose()?;

        Ok(Self {
            service: Some(std::env::var("SMTP_SERVICE").unwrap_or_else(|_| "gmail".to_string())),
            host: std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty()),
            port,
            tls,
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }

    /// Resolve host, port and TLS mode of the relay
    pub fn endpoint(&self) -> Result<RelayEndpoint, EmailError> {
        let (host, service_tls) = match (&self.host, &self.service) {
            (Some(host), _) => (host.clone(), None),
            (None, Some(service)) => {
                let (host, tls) = well_known_service(service).ok_or_else(|| {
                    EmailError::Configuration(format!(
                        "Unknown SMTP service: {}. Set SMTP_HOST for other relays",
                        service
                    ))
                })?;
                (host.to_string(), Some(tls))
            }
            (None, None) => {
                return Err(EmailError::Configuration(
                    "SMTP_HOST or SMTP_SERVICE is required for the smtp provider".to_string(),
                ))
            }
        };

        let tls = self.tls.or(service_tls).unwrap_or(SmtpTls::StartTls);
        let port = self.port.unwrap_or_else(|| tls.default_port());

        Ok(RelayEndpoint { host, port, tls })
    }
}

/// Resolved relay address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoint {
    pub host: String,
    pub port: u16,
    pub tls: SmtpTls,
}

fn well_known_service(name: &str) -> Option<(&'static str, SmtpTls)> {
    match name.to_ascii_lowercase().as_str() {
        "gmail" => Some(("smtp.gmail.com", SmtpTls::Tls)),
        "outlook" | "office365" | "hotmail" => Some(("smtp.office365.com", SmtpTls::StartTls)),
        "sendgrid" => Some(("smtp.sendgrid.net", SmtpTls::Tls)),
        _ => None,
    }
}

/// SMTP relay email service implementation
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    endpoint: RelayEndpoint,
    config: EmailConfig,
}

impl SmtpEmailService {
    /// Create a new SMTP relay email service
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let username = config.smtp.username.clone().ok_or_else(|| {
            EmailError::Configuration("SMTP_USERNAME is required for the smtp provider".to_string())
        })?;
        let password = config.smtp.password.clone().ok_or_else(|| {
            EmailError::Configuration("SMTP_PASSWORD is required for the smtp provider".to_string())
        })?;

        let endpoint = config.smtp.endpoint()?;

        let builder = match endpoint.tls {
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&endpoint.host),
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&endpoint.host),
            SmtpTls::None => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(
                &endpoint.host,
            )),
        }
        .map_err(|e| EmailError::Configuration(format!("Invalid SMTP relay: {}", e)))?;

        let transport = builder
            .port(endpoint.port)
            .credentials(Credentials::new(username, password))
            .build();

        tracing::info!(
            host = %endpoint.host,
            port = endpoint.port,
            tls = ?endpoint.tls,
            "SMTP relay configured"
        );

        Ok(Self {
            transport,
            endpoint,
            config,
        })
    }

    /// Relay this service delivers through
    pub fn endpoint(&self) -> &RelayEndpoint {
        &self.endpoint
    }
}

/// Convert an email message into a MIME message with its Message-ID
pub(crate) fn build_mime_message(message: &EmailMessage) -> Result<(Message, String), EmailError> {
    let from: Mailbox = message.from.parse().map_err(|e| {
        EmailError::Validation(format!("Invalid sender address '{}': {}", message.from, e))
    })?;
    let to: Mailbox = message.to.parse().map_err(|e| {
        EmailError::Validation(format!("Invalid recipient address '{}': {}", message.to, e))
    })?;

    let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

    let mut builder = Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .message_id(Some(message_id.clone()));

    if let Some(reply_to) = &message.reply_to {
        let reply_to: Mailbox = reply_to.parse().map_err(|e| {
            EmailError::Validation(format!("Invalid reply-to address '{}': {}", reply_to, e))
        })?;
        builder = builder.reply_to(reply_to);
    }

    let mime = match &message.body_html {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            message.body_text.clone(),
            html.clone(),
        )),
        None => builder.body(message.body_text.clone()),
    }
    .map_err(|e| EmailError::Validation(format!("Failed to build message: {}", e)))?;

    Ok((mime, message_id))
}

#[async_trait::async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        tracing::info!(
            "Sending email via SMTP relay {} to: {}",
            self.endpoint.host,
            message.to
        );

        let (mime, message_id) = build_mime_message(&message)?;

        let response = self
            .transport
            .send(mime)
            .await
            .map_err(|e| EmailError::Smtp(format!("Failed to send email: {}", e)))?;

        tracing::debug!(
            code = %response.code(),
            reply = %response.message().collect::<Vec<_>>().join(" "),
            "SMTP relay accepted message"
        );

        Ok(EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "smtp".to_string(),
            metadata: message.metadata.clone(),
        })
    }

    fn default_from(&self) -> String {
        self.config.default_from.clone()
    }

    fn verification_subject(&self) -> String {
        self.config.verification_subject.clone()
    }

    fn service_name(&self) -> &'static str {
        "smtp"
    }
}
