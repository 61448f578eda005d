use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{find_tool_call, log_outcome, reject};
use crate::models::appointment::{parse_timestamp, parse_wall_clock};
use crate::models::tool_call::{CheckAppointmentArgs, MakeAppointmentArgs};
use crate::models::{TimeInterval, ToolResults};
use crate::services::booking::{BookingError, BookingRequest};
use crate::services::request_log::RequestMeta;
use crate::state::AppState;

pub const CHECK_FUNCTION: &str = "checkAppointmentTime";
pub const BOOK_FUNCTION: &str = "makeAppointment";

pub const SLOT_AVAILABLE: &str = "Appointment time slot is available";
pub const SLOT_UNAVAILABLE: &str = "No available time slot";
pub const BOOKING_CONFIRMED: &str = "Email sent successfully!";
pub const BOOKING_FAILED: &str = "Failed to send email.";

// POST /checkappointmenttime
pub async fn check_appointment_time(
    State(state): State<Arc<AppState>>,
    meta: RequestMeta,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let call = match find_tool_call(&payload, CHECK_FUNCTION) {
        Ok(call) => call,
        Err(e) => return reject(&state, &meta, &payload, e).await,
    };

    let available = match call.function.parse_arguments::<CheckAppointmentArgs>() {
        Ok(args) => slot_available(&state, &args).await,
        Err(e) => {
            tracing::warn!(tool_call_id = %call.id, error = %e, "malformed checkAppointmentTime arguments");
            false
        }
    };

    let result = if available { SLOT_AVAILABLE } else { SLOT_UNAVAILABLE };
    tracing::info!(tool_call_id = %call.id, result, "availability checked");

    log_outcome(&state, &meta, &payload, StatusCode::OK, result).await;
    Json(ToolResults::single(&call.id, result)).into_response()
}

async fn slot_available(state: &AppState, args: &CheckAppointmentArgs) -> bool {
    let (from, to) = match (parse_timestamp(&args.from), parse_timestamp(&args.to)) {
        (Ok(from), Ok(to)) => (from, to),
        _ => {
            tracing::warn!(from = %args.from, to = %args.to, "unparseable requested interval");
            return false;
        }
    };

    match state.bookings.is_available(&TimeInterval::new(from, to)).await {
        Ok(available) => available,
        Err(e) => {
            tracing::error!(error = %e, "could not load appointments, reporting slot unavailable");
            false
        }
    }
}

// POST /makeappoint
pub async fn make_appointment(
    State(state): State<Arc<AppState>>,
    meta: RequestMeta,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    let call = match find_tool_call(&payload, BOOK_FUNCTION) {
        Ok(call) => call,
        Err(e) => return reject(&state, &meta, &payload, e).await,
    };

    let result = match call.function.parse_arguments::<MakeAppointmentArgs>() {
        Ok(args) => book(&state, args).await,
        Err(e) => {
            tracing::warn!(tool_call_id = %call.id, error = %e, "malformed makeAppointment arguments");
            BOOKING_FAILED
        }
    };

    log_outcome(&state, &meta, &payload, StatusCode::OK, result).await;
    Json(ToolResults::single(&call.id, result)).into_response()
}

async fn book(state: &AppState, args: MakeAppointmentArgs) -> &'static str {
    let parsed = (parse_timestamp(&args.date), parse_wall_clock(&args.date));
    let (start, display_start) = match parsed {
        (Ok(start), Ok(display_start)) => (start, display_start),
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(date = %args.date, error = %e, "unparseable appointment date");
            return BOOKING_FAILED;
        }
    };

    let request = BookingRequest {
        email: args.email,
        name: args.name,
        start,
        display_start,
        intent: args.intent,
    };

    match state.bookings.book(request).await {
        Ok(record) => {
            tracing::info!(from = %record.from, to = %record.to, "appointment booked");
            BOOKING_CONFIRMED
        }
        Err(BookingError::Conflict) => {
            tracing::info!(start = %start, "requested slot already taken");
            BOOKING_FAILED
        }
        Err(e) => {
            tracing::error!(error = %e, "booking failed");
            BOOKING_FAILED
        }
    }
}
