use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;
use validator::Validate;

use crate::models::billingmodel::{Invoice, InvoiceStatus, Payout, PayoutStatus};

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateInvoiceDto {
    pub booking_id: Uuid,
    pub discount: Option<BigDecimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkInvoicePaidDto {
    pub paid_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct InvoiceQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceResponseDto {
    pub status: String,
    pub data: Invoice,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceListResponseDto {
    pub status: String,
    pub results: usize,
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePayoutDto {
    pub cleaner_id: Uuid,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkPayoutPaidDto {
    pub paid_date: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct PayoutQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub cleaner_id: Option<Uuid>,
    pub status: Option<PayoutStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayoutResponseDto {
    pub status: String,
    pub data: Payout,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayoutListResponseDto {
    pub status: String,
    pub results: usize,
    pub payouts: Vec<Payout>,
}
