use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn to_str(&self) -> &str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// A paid or cancelled invoice can never be paid (again). Paying a paid
    /// invoice would double-count the customer's lifetime value.
    pub fn can_be_paid(&self) -> bool {
        !matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Invoice {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub customer_id: Uuid,
    pub invoice_number: String,
    pub subtotal: BigDecimal,
    pub tax: BigDecimal,
    pub discount: BigDecimal,
    pub total: BigDecimal,
    pub status: InvoiceStatus,
    pub due_date: Option<DateTime<Utc>>,
    /// Set if and only if `status` is `paid`.
    pub paid_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "payout_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PayoutStatus {
    Pending,
    Processing,
    Paid,
    Failed,
}

impl PayoutStatus {
    pub fn to_str(&self) -> &str {
        match self {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Processing => "processing",
            PayoutStatus::Paid => "paid",
            PayoutStatus::Failed => "failed",
        }
    }

    pub fn can_be_paid(&self) -> bool {
        matches!(self, PayoutStatus::Pending | PayoutStatus::Processing)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Payout {
    pub id: Uuid,
    pub cleaner_id: Uuid,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub total_amount: BigDecimal,
    pub status: PayoutStatus,
    pub paid_date: Option<DateTime<Utc>>,
    pub transaction_id: Option<String>,
    /// Commission line items, one per billed booking in the period.
    pub breakdown: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

/// One commission line inside a payout breakdown.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CommissionLine {
    pub booking_id: Uuid,
    pub invoice_id: Uuid,
    pub invoice_total: BigDecimal,
    pub commission_rate: BigDecimal,
    pub amount: BigDecimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_and_cancelled_invoices_are_immutable() {
        assert!(!InvoiceStatus::Paid.can_be_paid());
        assert!(!InvoiceStatus::Cancelled.can_be_paid());
        assert!(InvoiceStatus::Draft.can_be_paid());
        assert!(InvoiceStatus::Sent.can_be_paid());
        assert!(InvoiceStatus::Overdue.can_be_paid());
    }

    #[test]
    fn only_pending_or_processing_payouts_can_be_paid() {
        assert!(PayoutStatus::Pending.can_be_paid());
        assert!(PayoutStatus::Processing.can_be_paid());
        assert!(!PayoutStatus::Paid.can_be_paid());
        assert!(!PayoutStatus::Failed.can_be_paid());
    }
}
