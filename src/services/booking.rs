use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use crate::models::{AppointmentRecord, TimeInterval};
use crate::services::appointments::{AppointmentError, AppointmentStore};
use crate::services::mail::MailError;
use crate::services::notification::NotificationSender;
use crate::services::overlap;

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub email: String,
    pub name: String,
    /// Slot start as stored and compared against other bookings.
    pub start: NaiveDateTime,
    /// Slot start on the caller's own clock, used in the confirmation email.
    pub display_start: NaiveDateTime,
    pub intent: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("requested slot overlaps an existing appointment")]
    Conflict,

    #[error("could not read existing appointments: {0}")]
    Lookup(#[source] AppointmentError),

    #[error("confirmation email failed: {0}")]
    Notification(#[from] MailError),

    #[error("appointment was not recorded: {0}")]
    Persist(#[source] AppointmentError),
}

/// Availability checks and bookings against the shared appointment calendar.
pub struct BookingService {
    appointments: AppointmentStore,
    notifier: NotificationSender,
    // Serializes read-check-notify-append so two bookings in this process
    // cannot both pass the overlap check.
    writer: Mutex<()>,
}

impl BookingService {
    pub fn new(appointments: AppointmentStore, notifier: NotificationSender) -> Self {
        Self {
            appointments,
            notifier,
            writer: Mutex::new(()),
        }
    }

    pub fn appointments(&self) -> &AppointmentStore {
        &self.appointments
    }

    pub async fn is_available(&self, requested: &TimeInterval) -> Result<bool, AppointmentError> {
        let existing = self.appointments.existing_intervals().await?;
        Ok(overlap::is_available(requested, &existing))
    }

    /// Books a fixed-length slot. The customer is mailed before anything is
    /// written, and nothing is written if the mail fails.
    pub async fn book(&self, request: BookingRequest) -> Result<AppointmentRecord, BookingError> {
        let slot = TimeInterval::booking_slot(request.start);
        let _writer = self.writer.lock().await;

        let existing = self
            .appointments
            .existing_intervals()
            .await
            .map_err(BookingError::Lookup)?;
        if !overlap::is_available(&slot, &existing) {
            return Err(BookingError::Conflict);
        }

        self.notifier
            .send_confirmation(&request.email, &request.name, &request.display_start, &request.intent)
            .await?;

        let record = AppointmentRecord {
            from: slot.from,
            to: slot.to,
            name: request.name,
            email: request.email,
            intent: request.intent,
        };
        self.appointments
            .append_appointment(&record)
            .await
            .map_err(BookingError::Persist)?;

        Ok(record)
    }
}
