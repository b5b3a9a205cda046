//! Outbound email delivery abstraction.
//!
//! OTP dispatch is best-effort: the sender either delivers or returns an
//! error, and the caller falls back to logging the code. Local dev uses
//! [`LogEmailSender`]; deployments with SMTP configured use
//! [`SmtpEmailSender`].

use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Email delivery abstraction.
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error so the caller can fall back.
    ///
    /// # Errors
    /// Returns an error when delivery fails.
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "email send stub"
        );
        Ok(())
    }
}

/// SMTP relay sender.
pub struct SmtpEmailSender {
    transport: SmtpTransport,
    from: String,
}

impl SmtpEmailSender {
    /// Build a sender over an SMTP relay with credentials.
    ///
    /// # Errors
    /// Returns an error if the relay host is invalid.
    pub fn new(
        host: &str,
        port: u16,
        username: String,
        password: SecretString,
        from: String,
    ) -> Result<Self> {
        let transport = SmtpTransport::relay(host)
            .with_context(|| format!("invalid SMTP relay host: {host}"))?
            .port(port)
            .credentials(Credentials::new(
                username,
                password.expose_secret().to_string(),
            ))
            .build();
        Ok(Self { transport, from })
    }
}

impl EmailSender for SmtpEmailSender {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        let email = Message::builder()
            .from(self.from.parse().context("invalid from address")?)
            .to(message.to.parse().context("invalid recipient address")?)
            .subject(&message.subject)
            .header(ContentType::TEXT_HTML)
            .body(message.html.clone())
            .context("failed to build email")?;

        self.transport
            .send(&email)
            .context("SMTP delivery failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_sender_always_succeeds() {
        let sender = LogEmailSender;
        let result = sender.send(&EmailMessage {
            to: "alice@example.com".to_string(),
            subject: "Your login code".to_string(),
            html: "<p>123456</p>".to_string(),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn smtp_sender_rejects_bad_recipient() {
        let sender = SmtpEmailSender::new(
            "smtp.example.com",
            587,
            "mailer".to_string(),
            SecretString::from("secret".to_string()),
            "no-reply@example.com".to_string(),
        );
        let Ok(sender) = sender else {
            panic!("expected transport to build");
        };
        let result = sender.send(&EmailMessage {
            to: "not an address".to_string(),
            subject: "subject".to_string(),
            html: "<p>body</p>".to_string(),
        });
        assert!(result.is_err());
    }
}
