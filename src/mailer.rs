//! Outbound contact-form notifications via SMTP.
//!
//! Delivery is strictly best-effort: the contact message is persisted first
//! and the notification runs in a detached task, so a mail failure can never
//! fail the owning write. When the SMTP environment is incomplete the app
//! runs with [`NoopMailer`] and logs that notifications are disabled.

use async_trait::async_trait;
use std::env;
use std::sync::Arc;

use crate::models::ContactMessage;

/// MailError
///
/// Error type for notification delivery failures. These are logged and
/// swallowed by the caller.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("email build error: {0}")]
    Build(String),
}

/// Default relay when `SMTP_HOST` is not set (implicit TLS, port 465).
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// MailConfig
///
/// SMTP credentials plus the address that receives contact notifications.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_email: String,
    pub smtp_password: String,
    pub notification_email: String,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` unless `SMTP_EMAIL`, `SMTP_PASSWORD`, and
    /// `NOTIFICATION_EMAIL` are all present, signalling that email delivery is
    /// not configured and notifications should be skipped. `SMTP_HOST` is
    /// optional and defaults to Gmail's relay.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string()),
            smtp_email: env::var("SMTP_EMAIL").ok()?,
            smtp_password: env::var("SMTP_PASSWORD").ok()?,
            notification_email: env::var("NOTIFICATION_EMAIL").ok()?,
        })
    }
}

/// Mailer
///
/// Seam between the contact handler and the SMTP transport, so tests and
/// unconfigured deployments run without a network dependency.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_contact_notification(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// The concrete type used to share the mailer across the application state.
pub type MailerState = Arc<dyn Mailer>;

// --- SMTP Implementation ---

/// SmtpMailer
///
/// Sends a plain-text + HTML notification for each contact submission, with
/// Reply-To set to the submitter so the owner can answer directly.
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

fn plain_body(message: &ContactMessage) -> String {
    format!(
        "New message received through the portfolio contact form.\n\n\
         From: {}\nEmail: {}\nSubject: {}\n\nMessage:\n{}\n\n---\n\
         This email was sent automatically by your website.\n",
        message.name, message.email, message.subject, message.message
    )
}

fn html_body(message: &ContactMessage) -> String {
    format!(
        "<!DOCTYPE html><html><body style=\"font-family: Arial, sans-serif; color: #333;\">\
         <h2>New contact message</h2>\
         <p><b>From:</b> {}</p>\
         <p><b>Email:</b> <a href=\"mailto:{}\">{}</a></p>\
         <p><b>Subject:</b> {}</p>\
         <div style=\"padding: 12px; border-left: 4px solid #ef4444; background: #f9f9f9;\">{}</div>\
         <p style=\"color: #999; font-size: 12px;\">Reply to this email to answer {} directly.</p>\
         </body></html>",
        message.name,
        message.email,
        message.email,
        message.subject,
        message.message.replace('\n', "<br>"),
        message.name
    )
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_contact_notification(&self, message: &ContactMessage) -> Result<(), MailError> {
        use lettre::{
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
            message::MultiPart, transport::smtp::authentication::Credentials,
        };

        let subject = format!("[portfolio] New message: {}", message.subject);

        let email = Message::builder()
            .from(self.config.smtp_email.parse()?)
            .to(self.config.notification_email.parse()?)
            // Lets the owner answer the submitter straight from their inbox.
            .reply_to(message.email.parse()?)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                plain_body(message),
                html_body(message),
            ))
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)?
            .credentials(Credentials::new(
                self.config.smtp_email.clone(),
                self.config.smtp_password.clone(),
            ))
            .build();

        mailer.send(email).await?;

        tracing::info!(from = %message.email, "Contact notification email sent");
        Ok(())
    }
}

// --- No-op Implementation (Unconfigured / Tests) ---

/// NoopMailer
///
/// Stands in when SMTP is not configured and in tests. Always succeeds.
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_contact_notification(&self, _message: &ContactMessage) -> Result<(), MailError> {
        tracing::debug!("Mail not configured; skipping contact notification");
        Ok(())
    }
}
