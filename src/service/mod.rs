pub mod billing;
pub mod booking_lifecycle;
pub mod error;
pub mod time_tracking;
