use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::billingmodel::{Invoice, InvoiceStatus, Payout, PayoutStatus};

const INVOICE_COLUMNS: &str = r#"
    id, booking_id, customer_id, invoice_number, subtotal, tax, discount,
    total, status, due_date, paid_date, notes, created_at
"#;

const PAYOUT_COLUMNS: &str = r#"
    id, cleaner_id, period_start, period_end, total_amount, status,
    paid_date, transaction_id, breakdown, created_at
"#;

/// One billed, completed booking for a cleaner inside a payout window.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BilledJob {
    pub booking_id: Uuid,
    pub invoice_id: Uuid,
    pub invoice_total: BigDecimal,
}

#[async_trait]
pub trait BillingExt {
    async fn save_invoice(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        invoice_number: String,
        subtotal: BigDecimal,
        tax: BigDecimal,
        discount: BigDecimal,
        total: BigDecimal,
        due_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<Invoice, sqlx::Error>;

    async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, sqlx::Error>;

    async fn get_invoices(
        &self,
        status: Option<InvoiceStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Invoice>, sqlx::Error>;

    async fn mark_invoice_sent(&self, invoice_id: Uuid)
        -> Result<Option<Invoice>, sqlx::Error>;

    /// Marks the invoice paid and folds its total into the customer's
    /// lifetime value, in one transaction. The status guard in the UPDATE
    /// means a concurrent double-pay settles exactly one winner; the loser
    /// sees `None` and the lifetime value moves once.
    async fn mark_invoice_paid(
        &self,
        invoice_id: Uuid,
        paid_date: DateTime<Utc>,
    ) -> Result<Option<Invoice>, sqlx::Error>;

    /// Completed bookings assigned to the cleaner whose invoice was paid
    /// inside the window. Payout aggregation sums commission over these.
    async fn get_billed_jobs(
        &self,
        cleaner_id: Uuid,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Vec<BilledJob>, sqlx::Error>;

    async fn save_payout(
        &self,
        cleaner_id: Uuid,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        total_amount: BigDecimal,
        breakdown: serde_json::Value,
    ) -> Result<Payout, sqlx::Error>;

    async fn get_payout(&self, payout_id: Uuid) -> Result<Option<Payout>, sqlx::Error>;

    async fn get_payouts(
        &self,
        cleaner_id: Option<Uuid>,
        status: Option<PayoutStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payout>, sqlx::Error>;

    async fn mark_payout_paid(
        &self,
        payout_id: Uuid,
        paid_date: DateTime<Utc>,
        transaction_id: Option<String>,
    ) -> Result<Option<Payout>, sqlx::Error>;
}

#[async_trait]
impl BillingExt for DBClient {
    async fn save_invoice(
        &self,
        booking_id: Uuid,
        customer_id: Uuid,
        invoice_number: String,
        subtotal: BigDecimal,
        tax: BigDecimal,
        discount: BigDecimal,
        total: BigDecimal,
        due_date: DateTime<Utc>,
        notes: Option<String>,
    ) -> Result<Invoice, sqlx::Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO invoices
                (booking_id, customer_id, invoice_number, subtotal, tax,
                 discount, total, status, due_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'draft'::invoice_status, $8, $9)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(customer_id)
        .bind(invoice_number)
        .bind(subtotal)
        .bind(tax)
        .bind(discount)
        .bind(total)
        .bind(due_date)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, sqlx::Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE id = $1
            "#
        ))
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_invoices(
        &self,
        status: Option<InvoiceStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        match status {
            Some(status) => {
                sqlx::query_as::<_, Invoice>(&format!(
                    r#"
                    SELECT {INVOICE_COLUMNS}
                    FROM invoices
                    WHERE status = $1
                    ORDER BY created_at DESC LIMIT $2 OFFSET $3
                    "#
                ))
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Invoice>(&format!(
                    r#"
                    SELECT {INVOICE_COLUMNS}
                    FROM invoices
                    ORDER BY created_at DESC LIMIT $1 OFFSET $2
                    "#
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn mark_invoice_sent(
        &self,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'sent'::invoice_status
            WHERE id = $1 AND status = 'draft'::invoice_status
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_invoice_paid(
        &self,
        invoice_id: Uuid,
        paid_date: DateTime<Utc>,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'paid'::invoice_status, paid_date = $2
            WHERE id = $1
              AND status NOT IN ('paid'::invoice_status, 'cancelled'::invoice_status)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(paid_date)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(invoice) = invoice {
            sqlx::query(
                r#"
                UPDATE customers
                SET lifetime_value = lifetime_value + $2, updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(invoice.customer_id)
            .bind(&invoice.total)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(Some(invoice))
        } else {
            tx.rollback().await?;
            Ok(None)
        }
    }

    async fn get_billed_jobs(
        &self,
        cleaner_id: Uuid,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Vec<BilledJob>, sqlx::Error> {
        sqlx::query_as::<_, BilledJob>(
            r#"
            SELECT b.id AS booking_id, i.id AS invoice_id, i.total AS invoice_total
            FROM bookings b
            JOIN invoices i ON i.booking_id = b.id
            WHERE b.assigned_to = $1
              AND b.status = 'completed'::booking_status
              AND i.status = 'paid'::invoice_status
              AND i.paid_date >= $2
              AND i.paid_date < $3
            ORDER BY i.paid_date ASC
            "#,
        )
        .bind(cleaner_id)
        .bind(period_start)
        .bind(period_end)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_payout(
        &self,
        cleaner_id: Uuid,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
        total_amount: BigDecimal,
        breakdown: serde_json::Value,
    ) -> Result<Payout, sqlx::Error> {
        sqlx::query_as::<_, Payout>(&format!(
            r#"
            INSERT INTO payouts
                (cleaner_id, period_start, period_end, total_amount, status, breakdown)
            VALUES ($1, $2, $3, $4, 'pending'::payout_status, $5)
            RETURNING {PAYOUT_COLUMNS}
            "#
        ))
        .bind(cleaner_id)
        .bind(period_start)
        .bind(period_end)
        .bind(total_amount)
        .bind(breakdown)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_payout(&self, payout_id: Uuid) -> Result<Option<Payout>, sqlx::Error> {
        sqlx::query_as::<_, Payout>(&format!(
            r#"
            SELECT {PAYOUT_COLUMNS}
            FROM payouts
            WHERE id = $1
            "#
        ))
        .bind(payout_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_payouts(
        &self,
        cleaner_id: Option<Uuid>,
        status: Option<PayoutStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payout>, sqlx::Error> {
        sqlx::query_as::<_, Payout>(&format!(
            r#"
            SELECT {PAYOUT_COLUMNS}
            FROM payouts
            WHERE ($1::uuid IS NULL OR cleaner_id = $1)
              AND ($2::payout_status IS NULL OR status = $2)
            ORDER BY created_at DESC LIMIT $3 OFFSET $4
            "#
        ))
        .bind(cleaner_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_payout_paid(
        &self,
        payout_id: Uuid,
        paid_date: DateTime<Utc>,
        transaction_id: Option<String>,
    ) -> Result<Option<Payout>, sqlx::Error> {
        sqlx::query_as::<_, Payout>(&format!(
            r#"
            UPDATE payouts
            SET status = 'paid'::payout_status,
                paid_date = $2,
                transaction_id = COALESCE($3, transaction_id)
            WHERE id = $1
              AND status IN ('pending'::payout_status, 'processing'::payout_status)
            RETURNING {PAYOUT_COLUMNS}
            "#
        ))
        .bind(payout_id)
        .bind(paid_date)
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use sqlx::PgPool;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    async fn seed_customer(pool: &PgPool, lifetime_value: &str) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO customers (first_name, last_name, email, lifetime_value)
            VALUES ('Ada', 'Eze', $1, $2::numeric)
            RETURNING id
            "#,
        )
        .bind(format!("{}@customers.test", Uuid::new_v4()))
        .bind(lifetime_value)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_completed_booking(pool: &PgPool, customer_id: Uuid) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO bookings (customer_id, status)
            VALUES ($1, 'completed'::booking_status)
            RETURNING id
            "#,
        )
        .bind(customer_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn lifetime_value(pool: &PgPool, customer_id: Uuid) -> BigDecimal {
        sqlx::query_scalar("SELECT lifetime_value FROM customers WHERE id = $1")
            .bind(customer_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test]
    async fn paying_an_invoice_moves_lifetime_value_exactly_once(pool: PgPool) {
        let db = DBClient::new(pool.clone());
        let customer_id = seed_customer(&pool, "50.00").await;
        let booking_id = seed_completed_booking(&pool, customer_id).await;

        let invoice = db
            .save_invoice(
                booking_id,
                customer_id,
                "INV-2026-000001".to_string(),
                dec("110.00"),
                dec("10.00"),
                dec("0.00"),
                dec("120.00"),
                Utc::now(),
                None,
            )
            .await
            .unwrap();

        let paid = db
            .mark_invoice_paid(invoice.id, Utc::now())
            .await
            .unwrap();
        assert!(paid.is_some());
        assert_eq!(lifetime_value(&pool, customer_id).await, dec("170.00"));

        // The status guard makes a second pay a no-op.
        let again = db
            .mark_invoice_paid(invoice.id, Utc::now())
            .await
            .unwrap();
        assert!(again.is_none());
        assert_eq!(lifetime_value(&pool, customer_id).await, dec("170.00"));
    }

    #[sqlx::test]
    async fn payout_pay_stamps_the_given_paid_date(pool: PgPool) {
        let db = DBClient::new(pool.clone());
        let cleaner_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO cleaners (first_name, last_name, email, password)
            VALUES ('Ngozi', 'Ike', $1, 'not-a-real-hash')
            RETURNING id
            "#,
        )
        .bind(format!("{}@cleaners.test", Uuid::new_v4()))
        .fetch_one(&pool)
        .await
        .unwrap();

        let period_start = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
        let period_end = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let payout = db
            .save_payout(cleaner_id, period_start, period_end, dec("45.00"), json!([]))
            .await
            .unwrap();

        let paid_date = Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap();
        let paid = db
            .mark_payout_paid(payout.id, paid_date, Some("txn-001".to_string()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(paid.paid_date, Some(paid_date));
        assert_eq!(paid.transaction_id.as_deref(), Some("txn-001"));

        let again = db
            .mark_payout_paid(payout.id, Utc::now(), None)
            .await
            .unwrap();
        assert!(again.is_none());
    }
}
