use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::timemodel::{JobPhoto, PhotoType, TimeTracking};

const TIME_COLUMNS: &str = r#"
    id, booking_id, cleaner_id, clock_in, clock_out,
    clock_in_lat, clock_in_lng, clock_out_lat, clock_out_lng,
    travel_time, work_time, total_time, created_at
"#;

const PHOTO_COLUMNS: &str = r#"
    id, booking_id, cleaner_id, photo_type, photo_url, caption,
    location, created_at
"#;

#[async_trait]
pub trait TimeTrackingExt {
    /// Opens a time record and moves the booking to `in-progress` in one
    /// transaction. The booking update re-checks assignment and terminal
    /// state inside the transaction; `None` means the guard lost (booking
    /// gone, reassigned or terminal since the caller last looked) and
    /// nothing was written. The partial unique index on open records makes
    /// a second concurrent clock-in for the same pair fail with a unique
    /// violation, which the caller maps to a conflict.
    async fn clock_in(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        lat: Option<BigDecimal>,
        lng: Option<BigDecimal>,
        travel_time: Option<i32>,
    ) -> Result<Option<TimeTracking>, sqlx::Error>;

    async fn get_open_record(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
    ) -> Result<Option<TimeTracking>, sqlx::Error>;

    /// Closes the open record for the pair, stamping clock-out and the
    /// computed durations. The `clock_out IS NULL` guard makes the close
    /// idempotent under races; `None` means no record was open.
    async fn close_open_record(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        clock_out: DateTime<Utc>,
        lat: Option<BigDecimal>,
        lng: Option<BigDecimal>,
        work_time: i32,
        total_time: i32,
    ) -> Result<Option<TimeTracking>, sqlx::Error>;

    async fn get_time_records(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<TimeTracking>, sqlx::Error>;

    async fn save_photo(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        photo_type: PhotoType,
        photo_url: String,
        caption: Option<String>,
        location: Option<String>,
    ) -> Result<JobPhoto, sqlx::Error>;

    async fn get_photos(&self, booking_id: Uuid) -> Result<Vec<JobPhoto>, sqlx::Error>;
}

#[async_trait]
impl TimeTrackingExt for DBClient {
    async fn clock_in(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        lat: Option<BigDecimal>,
        lng: Option<BigDecimal>,
        travel_time: Option<i32>,
    ) -> Result<Option<TimeTracking>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Guard first: a cancel or reassignment committed since the caller's
        // read must not be overwritten back to in-progress.
        let booking: Option<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE bookings
            SET status = 'in-progress'::booking_status, updated_at = NOW()
            WHERE id = $1
              AND assigned_to = $2
              AND status NOT IN ('completed'::booking_status, 'cancelled'::booking_status)
            RETURNING id
            "#,
        )
        .bind(booking_id)
        .bind(cleaner_id)
        .fetch_optional(&mut *tx)
        .await?;

        if booking.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        let record = sqlx::query_as::<_, TimeTracking>(&format!(
            r#"
            INSERT INTO time_tracking
                (booking_id, cleaner_id, clock_in, clock_in_lat, clock_in_lng, travel_time)
            VALUES ($1, $2, NOW(), $3, $4, $5)
            RETURNING {TIME_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(cleaner_id)
        .bind(&lat)
        .bind(&lng)
        .bind(travel_time)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(record))
    }

    async fn get_open_record(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
    ) -> Result<Option<TimeTracking>, sqlx::Error> {
        sqlx::query_as::<_, TimeTracking>(&format!(
            r#"
            SELECT {TIME_COLUMNS}
            FROM time_tracking
            WHERE booking_id = $1 AND cleaner_id = $2 AND clock_out IS NULL
            "#
        ))
        .bind(booking_id)
        .bind(cleaner_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn close_open_record(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        clock_out: DateTime<Utc>,
        lat: Option<BigDecimal>,
        lng: Option<BigDecimal>,
        work_time: i32,
        total_time: i32,
    ) -> Result<Option<TimeTracking>, sqlx::Error> {
        sqlx::query_as::<_, TimeTracking>(&format!(
            r#"
            UPDATE time_tracking
            SET clock_out = $3,
                clock_out_lat = $4,
                clock_out_lng = $5,
                work_time = $6,
                total_time = $7
            WHERE booking_id = $1 AND cleaner_id = $2 AND clock_out IS NULL
            RETURNING {TIME_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(cleaner_id)
        .bind(clock_out)
        .bind(&lat)
        .bind(&lng)
        .bind(work_time)
        .bind(total_time)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_time_records(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<TimeTracking>, sqlx::Error> {
        sqlx::query_as::<_, TimeTracking>(&format!(
            r#"
            SELECT {TIME_COLUMNS}
            FROM time_tracking
            WHERE booking_id = $1
            ORDER BY clock_in ASC
            "#
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn save_photo(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        photo_type: PhotoType,
        photo_url: String,
        caption: Option<String>,
        location: Option<String>,
    ) -> Result<JobPhoto, sqlx::Error> {
        sqlx::query_as::<_, JobPhoto>(&format!(
            r#"
            INSERT INTO job_photos
                (booking_id, cleaner_id, photo_type, photo_url, caption, location)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PHOTO_COLUMNS}
            "#
        ))
        .bind(booking_id)
        .bind(cleaner_id)
        .bind(photo_type)
        .bind(photo_url)
        .bind(caption)
        .bind(location)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_photos(&self, booking_id: Uuid) -> Result<Vec<JobPhoto>, sqlx::Error> {
        sqlx::query_as::<_, JobPhoto>(&format!(
            r#"
            SELECT {PHOTO_COLUMNS}
            FROM job_photos
            WHERE booking_id = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    async fn seed_cleaner(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO cleaners (first_name, last_name, email, password)
            VALUES ('Ngozi', 'Ike', $1, 'not-a-real-hash')
            RETURNING id
            "#,
        )
        .bind(format!("{}@cleaners.test", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_booking(pool: &PgPool, assigned_to: Option<Uuid>, status: &str) -> Uuid {
        let customer_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO customers (first_name, last_name, email)
            VALUES ('Ada', 'Eze', $1)
            RETURNING id
            "#,
        )
        .bind(format!("{}@customers.test", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap();

        sqlx::query_scalar(
            r#"
            INSERT INTO bookings (customer_id, assigned_to, status)
            VALUES ($1, $2, $3::booking_status)
            RETURNING id
            "#,
        )
        .bind(customer_id)
        .bind(assigned_to)
        .bind(status)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn clock_in_refuses_a_cancelled_booking(pool: PgPool) {
        let db = DBClient::new(pool.clone());
        let cleaner_id = seed_cleaner(&pool).await;
        // Cancelled after assignment, as a cancel landing between a caller's
        // status check and the clock-in transaction would leave it.
        let booking_id = seed_booking(&pool, Some(cleaner_id), "cancelled").await;

        let record = db
            .clock_in(booking_id, cleaner_id, None, None, None)
            .await
            .unwrap();
        assert!(record.is_none());

        let status: String =
            sqlx::query_scalar("SELECT status::text FROM bookings WHERE id = $1")
                .bind(booking_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "cancelled");

        let records: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM time_tracking")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(records, 0);
    }

    #[sqlx::test]
    async fn clock_in_refuses_a_reassigned_booking(pool: PgPool) {
        let db = DBClient::new(pool.clone());
        let original = seed_cleaner(&pool).await;
        let replacement = seed_cleaner(&pool).await;
        let booking_id = seed_booking(&pool, Some(replacement), "assigned").await;

        let record = db
            .clock_in(booking_id, original, None, None, None)
            .await
            .unwrap();
        assert!(record.is_none());

        let status: String =
            sqlx::query_scalar("SELECT status::text FROM bookings WHERE id = $1")
                .bind(booking_id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, "assigned");
    }

    #[sqlx::test]
    async fn second_open_record_hits_the_partial_unique_index(pool: PgPool) {
        let db = DBClient::new(pool.clone());
        let cleaner_id = seed_cleaner(&pool).await;
        let booking_id = seed_booking(&pool, Some(cleaner_id), "assigned").await;

        let first = db
            .clock_in(booking_id, cleaner_id, None, None, None)
            .await
            .unwrap();
        assert!(first.is_some());

        let second = db.clock_in(booking_id, cleaner_id, None, None, None).await;
        match second {
            Err(sqlx::Error::Database(db_err)) => {
                assert_eq!(db_err.code().as_deref(), Some("23505"));
            }
            other => panic!("expected unique violation, got {:?}", other),
        }
    }
}
