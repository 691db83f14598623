use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Customer review for a completed booking. Created once, never updated.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Review {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub customer_id: Uuid,
    pub cleaner_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
    pub would_recommend: Option<bool>,
    pub is_public: Option<bool>,
    pub is_verified: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "lead_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    ProposalSent,
    Won,
    Lost,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "lead_temperature", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadTemperature {
    Hot,
    Warm,
    Cold,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Lead {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub status: Option<LeadStatus>,
    pub temperature: Option<LeadTemperature>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
