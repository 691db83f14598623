pub mod billingdtos;
pub mod bookingdtos;
pub mod cleanerdtos;
pub mod customerdtos;
pub mod engagementdtos;
