use std::sync::Arc;

use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode};
use chrono::{DateTime, Datelike, Duration, Utc};
use num_traits::Zero;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::{
        billingdb::{BilledJob, BillingExt},
        bookingdb::BookingExt,
        cleanerdb::CleanerExt,
        db::DBClient,
    },
    models::{
        billingmodel::{CommissionLine, Invoice, InvoiceStatus, Payout, PayoutStatus},
        bookingmodel::BookingStatus,
    },
    service::error::ServiceError,
};

/// Rounds to cents, half away from zero.
pub fn round_money(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// One commission line: invoice total × rate / 100, rounded to cents.
pub fn commission_amount(invoice_total: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    round_money(&(invoice_total * rate / BigDecimal::from(100)))
}

#[derive(Debug, Clone)]
pub struct BillingManager {
    db: Arc<DBClient>,
    tax_rate: BigDecimal,
    invoice_due_days: i64,
}

impl BillingManager {
    pub fn new(db: Arc<DBClient>, tax_rate: f64, invoice_due_days: i64) -> Self {
        BillingManager {
            db,
            tax_rate: BigDecimal::from_f64(tax_rate).unwrap_or_else(BigDecimal::zero),
            invoice_due_days,
        }
    }

    /// Derives a draft invoice from a booking: subtotal is the actual price
    /// when set, else the estimate; tax comes from the configured rate.
    /// A booking with neither a price nor a completed status has nothing to
    /// bill yet.
    pub async fn generate_invoice(
        &self,
        booking_id: Uuid,
        discount: Option<BigDecimal>,
        notes: Option<String>,
    ) -> Result<Invoice, ServiceError> {
        let booking = self
            .db
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        let price = booking.billable_price();
        if booking.status != BookingStatus::Completed && price.is_none() {
            return Err(ServiceError::Validation(
                "booking is not completed and has no price to bill".to_string(),
            ));
        }

        let subtotal = round_money(price.unwrap_or(&BigDecimal::zero()));
        let tax = round_money(&(&subtotal * &self.tax_rate));
        let discount = round_money(&discount.unwrap_or_else(BigDecimal::zero));
        let total = round_money(&(&subtotal + &tax - &discount));

        let invoice_number = format!(
            "INV-{}-{:06}",
            Utc::now().year(),
            rand::rng().random_range(0..1_000_000u32)
        );
        let due_date = Utc::now() + Duration::days(self.invoice_due_days);

        let invoice = self
            .db
            .save_invoice(
                booking_id,
                booking.customer_id,
                invoice_number,
                subtotal,
                tax,
                discount,
                total,
                due_date,
                notes,
            )
            .await?;

        info!(
            invoice_id = %invoice.id,
            booking_id = %booking_id,
            invoice_number = %invoice.invoice_number,
            "invoice generated"
        );
        Ok(invoice)
    }

    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<Invoice, ServiceError> {
        self.db
            .get_invoice(invoice_id)
            .await?
            .ok_or(ServiceError::InvoiceNotFound(invoice_id))
    }

    pub async fn list_invoices(
        &self,
        status: Option<InvoiceStatus>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Invoice>, ServiceError> {
        let offset = (page.saturating_sub(1) as i64) * limit as i64;
        let invoices = self.db.get_invoices(status, limit as i64, offset).await?;
        Ok(invoices)
    }

    pub async fn mark_invoice_sent(&self, invoice_id: Uuid) -> Result<Invoice, ServiceError> {
        match self.db.mark_invoice_sent(invoice_id).await? {
            Some(invoice) => Ok(invoice),
            None => Err(self.invoice_failure(invoice_id, InvoiceStatus::Sent).await?),
        }
    }

    /// Marks the invoice paid. The db layer folds the total into the owning
    /// customer's lifetime value inside the same transaction, so paying the
    /// same invoice twice can never double-count.
    pub async fn mark_invoice_paid(
        &self,
        invoice_id: Uuid,
        paid_date: Option<DateTime<Utc>>,
    ) -> Result<Invoice, ServiceError> {
        let paid_date = paid_date.unwrap_or_else(Utc::now);
        match self.db.mark_invoice_paid(invoice_id, paid_date).await? {
            Some(invoice) => {
                info!(invoice_id = %invoice.id, total = %invoice.total, "invoice paid");
                Ok(invoice)
            }
            None => Err(self.invoice_failure(invoice_id, InvoiceStatus::Paid).await?),
        }
    }

    /// Aggregates commissions for the cleaner's completed bookings whose
    /// invoice was paid inside `[period_start, period_end)`.
    pub async fn create_payout(
        &self,
        cleaner_id: Uuid,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Payout, ServiceError> {
        if period_end <= period_start {
            return Err(ServiceError::Validation(
                "payout period end must be after its start".to_string(),
            ));
        }

        let cleaner = self
            .db
            .get_cleaner(cleaner_id)
            .await?
            .ok_or(ServiceError::CleanerNotFound(cleaner_id))?;

        let rate = cleaner.commission_rate.unwrap_or_else(BigDecimal::zero);
        let jobs = self
            .db
            .get_billed_jobs(cleaner_id, period_start, period_end)
            .await?;

        let lines: Vec<CommissionLine> = jobs
            .iter()
            .map(|job: &BilledJob| CommissionLine {
                booking_id: job.booking_id,
                invoice_id: job.invoice_id,
                invoice_total: job.invoice_total.clone(),
                commission_rate: rate.clone(),
                amount: commission_amount(&job.invoice_total, &rate),
            })
            .collect();

        let total_amount = lines
            .iter()
            .fold(BigDecimal::zero(), |acc, line| acc + &line.amount);

        let breakdown = serde_json::to_value(&lines)
            .map_err(|err| ServiceError::Validation(err.to_string()))?;

        let payout = self
            .db
            .save_payout(cleaner_id, period_start, period_end, total_amount, breakdown)
            .await?;

        info!(
            payout_id = %payout.id,
            cleaner_id = %cleaner_id,
            total = %payout.total_amount,
            jobs = lines.len(),
            "payout created"
        );
        Ok(payout)
    }

    pub async fn get_payout(&self, payout_id: Uuid) -> Result<Payout, ServiceError> {
        self.db
            .get_payout(payout_id)
            .await?
            .ok_or(ServiceError::PayoutNotFound(payout_id))
    }

    pub async fn list_payouts(
        &self,
        cleaner_id: Option<Uuid>,
        status: Option<PayoutStatus>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Payout>, ServiceError> {
        let offset = (page.saturating_sub(1) as i64) * limit as i64;
        let payouts = self
            .db
            .get_payouts(cleaner_id, status, limit as i64, offset)
            .await?;
        Ok(payouts)
    }

    pub async fn mark_payout_paid(
        &self,
        payout_id: Uuid,
        paid_date: Option<DateTime<Utc>>,
        transaction_id: Option<String>,
    ) -> Result<Payout, ServiceError> {
        let paid_date = paid_date.unwrap_or_else(Utc::now);
        match self
            .db
            .mark_payout_paid(payout_id, paid_date, transaction_id)
            .await?
        {
            Some(payout) => {
                info!(payout_id = %payout.id, "payout paid");
                Ok(payout)
            }
            None => {
                let payout = self
                    .db
                    .get_payout(payout_id)
                    .await?
                    .ok_or(ServiceError::PayoutNotFound(payout_id))?;
                Err(ServiceError::InvalidTransition {
                    entity: "payout",
                    from: payout.status.to_str().to_string(),
                    to: PayoutStatus::Paid.to_str().to_string(),
                })
            }
        }
    }

    async fn invoice_failure(
        &self,
        invoice_id: Uuid,
        target: InvoiceStatus,
    ) -> Result<ServiceError, ServiceError> {
        let invoice = self
            .db
            .get_invoice(invoice_id)
            .await?
            .ok_or(ServiceError::InvoiceNotFound(invoice_id))?;

        Ok(ServiceError::InvalidTransition {
            entity: "invoice",
            from: invoice.status.to_str().to_string(),
            to: target.to_str().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn money_rounds_half_up_to_cents() {
        assert_eq!(round_money(&dec("10.005")), dec("10.01"));
        assert_eq!(round_money(&dec("10.004")), dec("10.00"));
        assert_eq!(round_money(&dec("10")), dec("10.00"));
    }

    #[test]
    fn commission_is_percentage_of_invoice_total() {
        // 25% of $180.00
        assert_eq!(commission_amount(&dec("180.00"), &dec("25")), dec("45.00"));
        // 12.5% of $99.99 = 12.49875 -> 12.50
        assert_eq!(commission_amount(&dec("99.99"), &dec("12.5")), dec("12.50"));
    }

    #[test]
    fn zero_rate_yields_zero_commission() {
        assert_eq!(
            commission_amount(&dec("500.00"), &BigDecimal::zero()),
            dec("0.00")
        );
    }

    #[test]
    fn invoice_arithmetic_subtotal_tax_discount() {
        let subtotal = dec("200.00");
        let tax_rate = dec("0.0825");
        let tax = round_money(&(&subtotal * &tax_rate));
        assert_eq!(tax, dec("16.50"));

        let discount = dec("20.00");
        let total = round_money(&(&subtotal + &tax - &discount));
        assert_eq!(total, dec("196.50"));
    }
}
