pub mod bookingmodel;
pub mod billingmodel;
pub mod cleanermodel;
pub mod customermodel;
pub mod engagementmodel;
pub mod timemodel;
