use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::{
    bookingmodel::{Booking, BookingStatus, NewBooking},
    customermodel::CustomerProfile,
};

const BOOKING_COLUMNS: &str = r#"
    id, customer_id, assigned_to, service_profile, frequency,
    specific_date, specific_time, estimated_price, actual_price,
    status, notes, created_at, updated_at
"#;

#[async_trait]
pub trait BookingExt {
    /// Atomic intake: upsert the customer by email (refreshing the mutable
    /// profile fields, keeping the existing id) and insert the booking
    /// referencing it, all inside one transaction. A booking row can never
    /// be observed pointing at a half-created customer.
    async fn create_booking_with_customer(
        &self,
        profile: CustomerProfile,
        booking: NewBooking,
    ) -> Result<(Booking, Uuid), sqlx::Error>;

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error>;

    async fn get_bookings(
        &self,
        status: Option<BookingStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error>;

    /// Sets `assigned_to` and lifts a still-pending booking to `assigned`,
    /// guarded against terminal states in the statement itself. Returns
    /// `None` when the booking is missing or terminal.
    async fn assign_cleaner(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error>;

    async fn mark_booking_en_route(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error>;

    async fn mark_booking_completed(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error>;

    async fn cancel_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error>;
}

#[async_trait]
impl BookingExt for DBClient {
    async fn create_booking_with_customer(
        &self,
        profile: CustomerProfile,
        booking: NewBooking,
    ) -> Result<(Booking, Uuid), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let customer_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO customers
                (first_name, last_name, email, phone, address, apt_unit,
                 city, state, zip_code, source)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'website'))
            ON CONFLICT (email) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = COALESCE(EXCLUDED.phone, customers.phone),
                address = COALESCE(EXCLUDED.address, customers.address),
                apt_unit = COALESCE(EXCLUDED.apt_unit, customers.apt_unit),
                city = COALESCE(EXCLUDED.city, customers.city),
                state = COALESCE(EXCLUDED.state, customers.state),
                zip_code = COALESCE(EXCLUDED.zip_code, customers.zip_code),
                updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.address)
        .bind(&profile.apt_unit)
        .bind(&profile.city)
        .bind(&profile.state)
        .bind(&profile.zip_code)
        .bind(&profile.source)
        .fetch_one(&mut *tx)
        .await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings
                (customer_id, service_profile, frequency, specific_date,
                 specific_time, estimated_price, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending'::booking_status)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(&booking.service_profile)
        .bind(booking.frequency)
        .bind(booking.specific_date)
        .bind(&booking.specific_time)
        .bind(&booking.estimated_price)
        .bind(&booking.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((booking, customer_id))
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE id = $1
            "#
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_bookings(
        &self,
        status: Option<BookingStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        match status {
            Some(status) => {
                sqlx::query_as::<_, Booking>(&format!(
                    r#"
                    SELECT {BOOKING_COLUMNS}
                    FROM bookings
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
                sqlx::query_as::<_, Booking>(&format!(
                    r#"
                    SELECT {BOOKING_COLUMNS}
                    FROM bookings
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

    async fn assign_cleaner(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET assigned_to = $2,
                status = CASE
                    WHEN status = 'pending'::booking_status THEN 'assigned'::booking_status
                    ELSE status
                END,
                updated_at = NOW()
            WHERE id = $1
              AND status NOT IN ('completed'::booking_status, 'cancelled'::booking_status)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(cleaner_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_booking_en_route(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'en-route'::booking_status, updated_at = NOW()
            WHERE id = $1 AND status = 'assigned'::booking_status
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn mark_booking_completed(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'completed'::booking_status, updated_at = NOW()
            WHERE id = $1
              AND status IN ('assigned'::booking_status,
                             'en-route'::booking_status,
                             'in-progress'::booking_status)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn cancel_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
        sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled'::booking_status, updated_at = NOW()
            WHERE id = $1
              AND status NOT IN ('completed'::booking_status, 'cancelled'::booking_status)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
    }
}
