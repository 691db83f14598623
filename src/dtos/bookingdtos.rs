use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    bookingmodel::{Booking, BookingStatus, Frequency, NewBooking},
    customermodel::CustomerProfile,
};

/// Intake form payload: the customer's contact block plus the booking
/// request itself, submitted in one shot by the public funnel.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct CreateBookingDto {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Email is invalid"))]
    pub email: String,

    pub phone: Option<String>,
    pub address: Option<String>,
    pub apt_unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub source: Option<String>,

    pub service_profile: Option<serde_json::Value>,
    pub frequency: Option<Frequency>,
    pub specific_date: Option<DateTime<Utc>>,
    pub specific_time: Option<String>,
    pub estimated_price: Option<BigDecimal>,
    pub notes: Option<String>,
}

impl CreateBookingDto {
    pub fn into_parts(self) -> (CustomerProfile, NewBooking) {
        let profile = CustomerProfile {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            apt_unit: self.apt_unit,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            source: self.source,
        };
        let booking = NewBooking {
            service_profile: self.service_profile,
            frequency: self.frequency,
            specific_date: self.specific_date,
            specific_time: self.specific_time,
            estimated_price: self.estimated_price,
            notes: self.notes,
        };
        (profile, booking)
    }
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct BookingQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub status: Option<BookingStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignCleanerDto {
    pub cleaner_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponseDto {
    pub status: String,
    pub data: Booking,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingListResponseDto {
    pub status: String,
    pub results: usize,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingCreatedDto {
    pub status: String,
    pub data: Booking,
    pub customer_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_dto() -> CreateBookingDto {
        CreateBookingDto {
            first_name: "Ada".to_string(),
            last_name: "Obi".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            address: None,
            apt_unit: None,
            city: None,
            state: None,
            zip_code: None,
            source: None,
            service_profile: None,
            frequency: None,
            specific_date: None,
            specific_time: None,
            estimated_price: None,
            notes: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(base_dto().validate().is_ok());
    }

    #[test]
    fn bad_email_fails_validation() {
        let mut dto = base_dto();
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn empty_name_fails_validation() {
        let mut dto = base_dto();
        dto.first_name = String::new();
        assert!(dto.validate().is_err());
    }
}
