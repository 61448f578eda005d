use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{MailError, Mailer};

/// Authenticated SMTP relay reached over STARTTLS.
pub struct SmtpMailer {
    from: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        username: String,
        password: String,
        from: String,
        timeout: Duration,
    ) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(Credentials::new(username, password))
            .timeout(Some(timeout))
            .build();

        Ok(Self { from, transport })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e: lettre::address::AddressError| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

/// Builds the HTML message without sending it.
pub fn build_message(from: &str, to: &str, subject: &str, html: String) -> Result<Message, MailError> {
    let message = Message::builder()
        .from(mailbox(from)?)
        .to(mailbox(to)?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html)?;
    Ok(message)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_html(&self, to: &str, subject: &str, html: String) -> Result<(), MailError> {
        let message = build_message(&self.from, to, subject, html)?;
        self.transport.send(message).await?;
        tracing::info!(to = %to, "confirmation email delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message_html() {
        let message = build_message(
            "coordinator@example.com",
            "alice@example.com",
            "Appointment Confirmation",
            "<p>Hello</p>".to_string(),
        )
        .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Appointment Confirmation"));
        assert!(raw.contains("To: alice@example.com"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn test_malformed_recipient() {
        let result = build_message(
            "coordinator@example.com",
            "not an address",
            "Appointment Confirmation",
            String::new(),
        );
        assert!(matches!(result, Err(MailError::Address { .. })));
    }

    #[tokio::test]
    async fn test_relay_builder_accepts_host() {
        let mailer = SmtpMailer::new(
            "smtp.example.com",
            587,
            "user".to_string(),
            "pass".to_string(),
            "coordinator@example.com".to_string(),
            Duration::from_secs(5),
        );
        assert!(mailer.is_ok());
    }
}
