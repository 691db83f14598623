use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

/// One row per clock-in attempt for a (booking, cleaner) pair. A null
/// `clock_out` marks the record as open; the partial unique index on
/// `(booking_id, cleaner_id) WHERE clock_out IS NULL` guarantees at most one
/// open record per pair. Closed records are never mutated again.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct TimeTracking {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub cleaner_id: Uuid,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub clock_in_lat: Option<BigDecimal>,
    pub clock_in_lng: Option<BigDecimal>,
    pub clock_out_lat: Option<BigDecimal>,
    pub clock_out_lng: Option<BigDecimal>,
    pub travel_time: Option<i32>,
    pub work_time: Option<i32>,
    pub total_time: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "photo_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PhotoType {
    Before,
    During,
    After,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct JobPhoto {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub cleaner_id: Uuid,
    pub photo_type: PhotoType,
    pub photo_url: String,
    pub caption: Option<String>,
    pub location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
