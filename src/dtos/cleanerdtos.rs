use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    cleanermodel::{Cleaner, CleanerRole},
    timemodel::{JobPhoto, TimeTracking},
};

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct LoginCleanerDto {
    #[validate(email(message = "Email is invalid"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Cleaner shape safe to put on the wire: no password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct FilterCleanerDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<CleanerRole>,
    pub hourly_rate: Option<BigDecimal>,
    pub commission_rate: Option<BigDecimal>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

impl FilterCleanerDto {
    pub fn filter_cleaner(cleaner: &Cleaner) -> Self {
        FilterCleanerDto {
            id: cleaner.id,
            first_name: cleaner.first_name.clone(),
            last_name: cleaner.last_name.clone(),
            email: cleaner.email.clone(),
            phone: cleaner.phone.clone(),
            role: cleaner.role,
            hourly_rate: cleaner.hourly_rate.clone(),
            commission_rate: cleaner.commission_rate.clone(),
            is_active: cleaner.is_active,
            created_at: cleaner.created_at,
        }
    }

    pub fn filter_cleaners(cleaners: &[Cleaner]) -> Vec<FilterCleanerDto> {
        cleaners.iter().map(FilterCleanerDto::filter_cleaner).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponseDto {
    pub status: String,
    pub token: String,
    pub cleaner: FilterCleanerDto,
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct CleanerQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub active_only: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClockInDto {
    pub booking_id: Uuid,
    pub lat: Option<BigDecimal>,
    pub lng: Option<BigDecimal>,
    /// Minutes spent travelling to the job, reported by the cleaner's app.
    pub travel_time: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClockOutDto {
    pub booking_id: Uuid,
    pub lat: Option<BigDecimal>,
    pub lng: Option<BigDecimal>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimeRecordResponseDto {
    pub status: String,
    pub data: TimeTracking,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimeRecordListResponseDto {
    pub status: String,
    pub results: usize,
    pub records: Vec<TimeTracking>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoResponseDto {
    pub status: String,
    pub data: JobPhoto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PhotoListResponseDto {
    pub status: String,
    pub results: usize,
    pub photos: Vec<JobPhoto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanerListResponseDto {
    pub status: String,
    pub results: usize,
    pub cleaners: Vec<FilterCleanerDto>,
}
