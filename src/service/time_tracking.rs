use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::types::BigDecimal;
use tracing::info;
use uuid::Uuid;

use crate::{
    db::{bookingdb::BookingExt, db::DBClient, timedb::TimeTrackingExt},
    models::{
        bookingmodel::BookingStatus,
        timemodel::{JobPhoto, PhotoType, TimeTracking},
    },
    service::error::ServiceError,
};

/// Whole minutes between two instants, rounded half away from zero.
/// A 2m05s shift is 2 minutes; 2m30s is 3.
pub fn work_minutes(clock_in: DateTime<Utc>, clock_out: DateTime<Utc>) -> i32 {
    let delta_ms = (clock_out - clock_in).num_milliseconds();
    ((delta_ms as f64) / 60_000.0).round() as i32
}

#[derive(Debug, Clone)]
pub struct TimeTrackingManager {
    db: Arc<DBClient>,
}

impl TimeTrackingManager {
    pub fn new(db: Arc<DBClient>) -> Self {
        TimeTrackingManager { db }
    }

    /// Opens a shift for the assigned cleaner and moves the booking to
    /// `in-progress`. A second open record for the same pair loses against
    /// the partial unique index and surfaces as `AlreadyClockedIn`.
    pub async fn clock_in(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        lat: Option<BigDecimal>,
        lng: Option<BigDecimal>,
        travel_time: Option<i32>,
    ) -> Result<TimeTracking, ServiceError> {
        let booking = self
            .db
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        if booking.assigned_to != Some(cleaner_id) {
            return Err(ServiceError::NotAssignedCleaner {
                booking_id,
                cleaner_id,
            });
        }

        if !booking.status.can_transition_to(BookingStatus::InProgress) {
            return Err(ServiceError::InvalidTransition {
                entity: "booking",
                from: booking.status.to_str().to_string(),
                to: BookingStatus::InProgress.to_str().to_string(),
            });
        }

        let record = self
            .db
            .clock_in(booking_id, cleaner_id, lat, lng, travel_time)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    ServiceError::AlreadyClockedIn {
                        booking_id,
                        cleaner_id,
                    }
                } else {
                    err.into()
                }
            })?;

        let record = match record {
            Some(record) => record,
            // The transaction's own guard lost against a concurrent cancel,
            // completion or reassignment committed after the checks above.
            None => return Err(self.clock_in_failure(booking_id, cleaner_id).await?),
        };

        info!(booking_id = %booking_id, cleaner_id = %cleaner_id, "clocked in");
        Ok(record)
    }

    async fn clock_in_failure(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
    ) -> Result<ServiceError, ServiceError> {
        let booking = self
            .db
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        if booking.assigned_to != Some(cleaner_id) {
            return Ok(ServiceError::NotAssignedCleaner {
                booking_id,
                cleaner_id,
            });
        }

        Ok(ServiceError::InvalidTransition {
            entity: "booking",
            from: booking.status.to_str().to_string(),
            to: BookingStatus::InProgress.to_str().to_string(),
        })
    }

    /// Closes the open shift, computing worked minutes from the stored
    /// clock-in and total minutes as worked plus the travel time recorded
    /// at clock-in.
    pub async fn clock_out(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        lat: Option<BigDecimal>,
        lng: Option<BigDecimal>,
    ) -> Result<TimeTracking, ServiceError> {
        let open = self
            .db
            .get_open_record(booking_id, cleaner_id)
            .await?
            .ok_or(ServiceError::NoOpenTimeRecord {
                booking_id,
                cleaner_id,
            })?;

        let now = Utc::now();
        let work_time = work_minutes(open.clock_in, now);
        let total_time = work_time + open.travel_time.unwrap_or(0);

        let record = self
            .db
            .close_open_record(booking_id, cleaner_id, now, lat, lng, work_time, total_time)
            .await?
            // A concurrent clock-out can close the record between the read
            // and the guarded update.
            .ok_or(ServiceError::NoOpenTimeRecord {
                booking_id,
                cleaner_id,
            })?;

        info!(
            booking_id = %booking_id,
            cleaner_id = %cleaner_id,
            work_time,
            total_time,
            "clocked out"
        );
        Ok(record)
    }

    pub async fn time_records(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<TimeTracking>, ServiceError> {
        let records = self.db.get_time_records(booking_id).await?;
        Ok(records)
    }

    pub async fn upload_photo(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
        photo_type: PhotoType,
        photo_url: String,
        caption: Option<String>,
        location: Option<String>,
    ) -> Result<JobPhoto, ServiceError> {
        self.db
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        let photo = self
            .db
            .save_photo(booking_id, cleaner_id, photo_type, photo_url, caption, location)
            .await?;
        Ok(photo)
    }

    pub async fn photos(&self, booking_id: Uuid) -> Result<Vec<JobPhoto>, ServiceError> {
        let photos = self.db.get_photos(booking_id).await?;
        Ok(photos)
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn sub_minute_shifts_round_to_nearest() {
        let start = Utc::now();
        assert_eq!(work_minutes(start, start + Duration::seconds(29)), 0);
        assert_eq!(work_minutes(start, start + Duration::seconds(30)), 1);
    }

    #[test]
    fn partial_minutes_round_half_up() {
        let start = Utc::now();
        // 2m05s -> 2, 2m30s -> 3
        assert_eq!(work_minutes(start, start + Duration::seconds(125)), 2);
        assert_eq!(work_minutes(start, start + Duration::seconds(150)), 3);
    }

    #[test]
    fn exact_minutes_are_exact() {
        let start = Utc::now();
        assert_eq!(work_minutes(start, start + Duration::minutes(90)), 90);
    }

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

    async fn seed_assigned_booking(pool: &PgPool, cleaner_id: Uuid) -> Uuid {
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
            VALUES ($1, $2, 'assigned'::booking_status)
            RETURNING id
            "#,
        )
        .bind(customer_id)
        .bind(cleaner_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test]
    async fn double_clock_in_is_a_conflict(pool: PgPool) {
        let db = Arc::new(DBClient::new(pool.clone()));
        let manager = TimeTrackingManager::new(db.clone());
        let cleaner_id = seed_cleaner(&pool).await;
        let booking_id = seed_assigned_booking(&pool, cleaner_id).await;

        manager
            .clock_in(booking_id, cleaner_id, None, None, None)
            .await
            .unwrap();

        let booking = db.get_booking(booking_id).await.unwrap().unwrap();
        assert_eq!(booking.status, BookingStatus::InProgress);

        let second = manager
            .clock_in(booking_id, cleaner_id, None, None, None)
            .await;
        assert!(matches!(
            second,
            Err(ServiceError::AlreadyClockedIn { .. })
        ));
    }

    #[sqlx::test]
    async fn clock_in_requires_assignment(pool: PgPool) {
        let db = Arc::new(DBClient::new(pool.clone()));
        let manager = TimeTrackingManager::new(db);
        let assigned = seed_cleaner(&pool).await;
        let intruder = seed_cleaner(&pool).await;
        let booking_id = seed_assigned_booking(&pool, assigned).await;

        let result = manager
            .clock_in(booking_id, intruder, None, None, None)
            .await;
        assert!(matches!(
            result,
            Err(ServiceError::NotAssignedCleaner { .. })
        ));
    }
}
