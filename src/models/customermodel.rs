use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "membership_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipTier {
    Standard,
    Premium,
    Vip,
}

/// Mutable profile fields refreshed on every upsert-by-email. The id,
/// email, lifetime value and membership tier are never touched by intake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub apt_unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub apt_unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub source: Option<String>,
    /// Cumulative total of this customer's paid invoices. Only
    /// `mark_invoice_paid` ever increases it; nothing decreases it.
    pub lifetime_value: BigDecimal,
    pub membership_tier: Option<MembershipTier>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
