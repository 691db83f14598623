use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "cleaner_role", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CleanerRole {
    Cleaner,
    LeadCleaner,
    Supervisor,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Cleaner {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Option<CleanerRole>,
    pub hourly_rate: Option<BigDecimal>,
    /// Percentage of billed revenue the cleaner earns per job.
    pub commission_rate: Option<BigDecimal>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}
