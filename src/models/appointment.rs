use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const BOOKING_DURATION_MINUTES: i64 = 30;

pub const APPOINTMENT_HEADERS: [&str; 5] = ["From", "To", "Name", "Email", "Intent"];

const STORED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Half-open `[from, to)` interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl TimeInterval {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }

    /// The fixed-length slot a booking starting at `start` occupies.
    pub fn booking_slot(start: NaiveDateTime) -> Self {
        Self {
            from: start,
            to: start + Duration::minutes(BOOKING_DURATION_MINUTES),
        }
    }

    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.from < other.to && self.to > other.from
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    pub name: String,
    pub email: String,
    pub intent: String,
}

impl AppointmentRecord {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::new(self.from, self.to)
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            format_timestamp(&self.from),
            format_timestamp(&self.to),
            self.name.clone(),
            self.email.clone(),
            self.intent.clone(),
        ]
    }
}

/// Parses an ISO-8601 timestamp. Values carrying an offset are normalized to
/// UTC; naive values are taken as-is.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }

    NAIVE_FORMATS.iter().skip(1).fold(
        NaiveDateTime::parse_from_str(s, NAIVE_FORMATS[0]),
        |parsed, fmt| parsed.or_else(|_| NaiveDateTime::parse_from_str(s, fmt)),
    )
}

/// Parses an ISO-8601 timestamp keeping the wall-clock time as written, so an
/// offset value reads the way the caller stated it.
pub fn parse_wall_clock(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(s.trim()) {
        Ok(dt) => Ok(dt.naive_local()),
        Err(_) => parse_timestamp(s),
    }
}

pub fn format_timestamp(dt: &NaiveDateTime) -> String {
    dt.format(STORED_FORMAT).to_string()
}
