use crate::services::booking::BookingService;
use crate::services::request_log::RequestLogger;

pub struct AppState {
    pub bookings: BookingService,
    pub request_log: RequestLogger,
}
