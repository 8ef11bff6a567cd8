//! Outbound Email Transport
//!
//! Thin trait over SMTP delivery so application code can be tested without
//! a relay. The production implementation uses lettre's async SMTP
//! transport over rustls.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// Sender or recipient address could not be parsed
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Message could not be built
    #[error("Failed to build message: {0}")]
    Message(String),

    /// The transport rejected or failed to deliver the message
    #[error("Email delivery failed: {0}")]
    Transport(String),
}

/// Outbound mail delivery
#[trait_variant::make(Mailer: Send)]
pub trait LocalMailer {
    /// Send an HTML email to a single recipient
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError>;
}

/// SMTP-backed mailer
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpMailer {
    /// Create a mailer against an SMTP relay with credentials
    pub fn new(
        relay: &str,
        username: String,
        password: String,
        from: String,
    ) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(relay)
            .map_err(|e| MailerError::Transport(e.to_string()))?
            .credentials(Credentials::new(username, password))
            .build();

        Ok(Self { transport, from })
    }

    /// Create a mailer against a local unauthenticated SMTP server (development)
    pub fn unencrypted_localhost(port: u16, from: String) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("localhost")
            .port(port)
            .build();

        Self { transport, from }
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerError> {
        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|_| MailerError::InvalidAddress(self.from.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailerError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| MailerError::Message(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        tracing::debug!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}
