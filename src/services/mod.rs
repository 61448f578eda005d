pub mod appointments;
pub mod booking;
pub mod mail;
pub mod notification;
pub mod overlap;
pub mod request_log;
pub mod tables;
