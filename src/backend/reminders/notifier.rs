/**
 * Notification Sender
 *
 * Outbound email delivery for reminders. The `Notifier` trait is the seam
 * the scheduler and the sweep talk to; `SmtpNotifier` delivers through
 * lettre's async SMTP transport and `LogNotifier` stands in when no SMTP
 * credentials are configured.
 *
 * Every delivery is bounded by the notifier's own timeout so a hung SMTP
 * server cannot hold a reminder job forever.
 */

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::backend::server::config::SmtpSettings;

/// A single outbound email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient address
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery errors
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),
    #[error("delivery failed: {0}")]
    Rejected(String),
}

/// Something that can deliver a notification
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt delivery; success means the message was accepted for delivery
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// SMTP delivery through lettre
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpNotifier {
    /// Build a notifier from SMTP settings
    ///
    /// Port 465 uses implicit TLS, any other port uses STARTTLS.
    pub fn new(settings: &SmtpSettings) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(settings.username.clone(), settings.password.clone());
        let builder = if settings.port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
        };
        let transport = builder
            .port(settings.port)
            .credentials(credentials)
            .timeout(Some(settings.timeout))
            .build();

        Ok(Self {
            transport,
            from: settings.from.parse()?,
            timeout: settings.timeout,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(notification.to.parse()?)
            .subject(notification.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())?;

        let response = tokio::time::timeout(self.timeout, self.transport.send(message))
            .await
            .map_err(|_| NotifyError::Timeout(self.timeout))??;

        tracing::debug!("SMTP accepted message for {}: {:?}", notification.to, response.code());
        Ok(())
    }
}

/// Writes reminders to the log instead of sending them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            "Email delivery disabled, reminder for {}: {} - {}",
            notification.to,
            notification.subject,
            notification.body
        );
        Ok(())
    }
}
