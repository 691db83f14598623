pub mod billingdb;
pub mod bookingdb;
pub mod cleanerdb;
pub mod customerdb;
#[allow(clippy::module_inception)]
pub mod db;
pub mod engagementdb;
pub mod timedb;
