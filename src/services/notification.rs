use std::time::Duration;

use chrono::NaiveDateTime;

use crate::services::mail::{MailError, Mailer};

pub const CONFIRMATION_SUBJECT: &str = "Appointment Confirmation";

/// Business details printed into every confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmationTemplate {
    pub coordinator_name: String,
    pub office_location: String,
    pub contact_number: String,
}

impl ConfirmationTemplate {
    pub fn render(&self, name: &str, date: &NaiveDateTime, intent: &str) -> String {
        let formatted_date = date.format("%B %d, %Y at %I:%M %p");
        let coordinator = &self.coordinator_name;
        let location = &self.office_location;
        let contact = &self.contact_number;

        format!(
            r#"<html>
<body>
    <h2>Appointment Confirmation</h2>
    <p>Dear {name},</p>
    <p>This is to confirm that you have successfully booked an appointment with {coordinator}.</p>

    <p><strong>Appointment Details:</strong></p>
    <ul>
        <li><strong>Date and Time:</strong> {formatted_date}</li>
        <li><strong>Location:</strong> {location}</li>
        <li><strong>Contact Number:</strong> {contact}</li>
        <li><strong>Purpose of Appointment:</strong> {intent}</li>
    </ul>

    <p>If you have any questions or need to reschedule, feel free to reach out to {coordinator} at <strong>{contact}</strong>.</p>

    <p>Thank you for scheduling with us!</p>
    <br>
    <p>Best regards,</p>
    <p><strong>{coordinator}</strong><br>Appointment Coordinator</p>
</body>
</html>
"#
        )
    }
}

pub struct NotificationSender {
    mailer: Box<dyn Mailer>,
    template: ConfirmationTemplate,
    timeout: Duration,
}

impl NotificationSender {
    pub fn new(mailer: Box<dyn Mailer>, template: ConfirmationTemplate, timeout: Duration) -> Self {
        Self {
            mailer,
            template,
            timeout,
        }
    }

    pub async fn send_confirmation(
        &self,
        email: &str,
        name: &str,
        date: &NaiveDateTime,
        intent: &str,
    ) -> Result<(), MailError> {
        let html = self.template.render(name, date, intent);
        tokio::time::timeout(
            self.timeout,
            self.mailer.send_html(email, CONFIRMATION_SUBJECT, html),
        )
        .await
        .map_err(|_| MailError::Timeout)?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;

    fn template() -> ConfirmationTemplate {
        ConfirmationTemplate {
            coordinator_name: "Mr. Kushagra".to_string(),
            office_location: "Mr. Kushagra's Office".to_string(),
            contact_number: "123456789".to_string(),
        }
    }

    fn date() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-06-01 14:05", "%Y-%m-%d %H:%M").unwrap()
    }

    struct RecordingMailer {
        sent: Arc<Mutex<Vec<(String, String, String)>>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_html(&self, to: &str, subject: &str, html: String) -> Result<(), MailError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), html));
            Ok(())
        }
    }

    struct HangingMailer;

    #[async_trait]
    impl Mailer for HangingMailer {
        async fn send_html(&self, _to: &str, _subject: &str, _html: String) -> Result<(), MailError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    #[test]
    fn test_render_substitutes_fields() {
        let html = template().render("Alice", &date(), "Tax consultation");
        assert!(html.contains("<p>Dear Alice,</p>"));
        assert!(html.contains("June 01, 2024 at 02:05 PM"));
        assert!(html.contains("<strong>Purpose of Appointment:</strong> Tax consultation"));
        assert!(html.contains("<strong>Location:</strong> Mr. Kushagra's Office"));
        assert!(html.contains("<strong>123456789</strong>"));
    }

    #[tokio::test]
    async fn test_send_confirmation_uses_subject() {
        let sent = Arc::new(Mutex::new(vec![]));
        let sender = NotificationSender::new(
            Box::new(RecordingMailer { sent: sent.clone() }),
            template(),
            Duration::from_secs(5),
        );

        sender
            .send_confirmation("alice@example.com", "Alice", &date(), "Checkup")
            .await
            .unwrap();

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "alice@example.com");
        assert_eq!(sent[0].1, CONFIRMATION_SUBJECT);
        assert!(sent[0].2.contains("Checkup"));
    }

    #[tokio::test]
    async fn test_hanging_relay_times_out() {
        let sender =
            NotificationSender::new(Box::new(HangingMailer), template(), Duration::from_millis(20));
        let err = sender
            .send_confirmation("alice@example.com", "Alice", &date(), "Checkup")
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Timeout));
    }
}
