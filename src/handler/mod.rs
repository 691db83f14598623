pub mod billing;
pub mod bookings;
pub mod cleaner;
pub mod customers;
pub mod engagement;
