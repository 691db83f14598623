use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    db::{bookingdb::BookingExt, cleanerdb::CleanerExt, db::DBClient},
    models::{
        bookingmodel::{Booking, BookingStatus, NewBooking},
        customermodel::CustomerProfile,
    },
    service::error::ServiceError,
};

/// Owns every `bookings.status` mutation except the clock-in path. Guarded
/// single-statement updates in the db layer enforce the transition table
/// under concurrency; this manager turns a lost guard into the right error.
#[derive(Debug, Clone)]
pub struct BookingLifecycleManager {
    db: Arc<DBClient>,
}

impl BookingLifecycleManager {
    pub fn new(db: Arc<DBClient>) -> Self {
        BookingLifecycleManager { db }
    }

    pub async fn create_booking(
        &self,
        profile: CustomerProfile,
        booking: NewBooking,
    ) -> Result<(Booking, Uuid), ServiceError> {
        let (booking, customer_id) = self
            .db
            .create_booking_with_customer(profile, booking)
            .await?;

        info!(
            booking_id = %booking.id,
            customer_id = %customer_id,
            "booking created"
        );
        Ok((booking, customer_id))
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        self.db
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))
    }

    pub async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Booking>, ServiceError> {
        let offset = (page.saturating_sub(1) as i64) * limit as i64;
        let bookings = self.db.get_bookings(status, limit as i64, offset).await?;
        Ok(bookings)
    }

    pub async fn assign_cleaner(
        &self,
        booking_id: Uuid,
        cleaner_id: Uuid,
    ) -> Result<Booking, ServiceError> {
        let cleaner = self
            .db
            .get_cleaner(cleaner_id)
            .await?
            .ok_or(ServiceError::CleanerNotFound(cleaner_id))?;

        if cleaner.is_active == Some(false) {
            return Err(ServiceError::Validation(
                "cleaner account is deactivated".to_string(),
            ));
        }

        match self.db.assign_cleaner(booking_id, cleaner_id).await? {
            Some(booking) => {
                info!(booking_id = %booking.id, cleaner_id = %cleaner_id, "cleaner assigned");
                Ok(booking)
            }
            None => Err(self.transition_failure(booking_id, BookingStatus::Assigned).await?),
        }
    }

    pub async fn mark_en_route(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        match self.db.mark_booking_en_route(booking_id).await? {
            Some(booking) => Ok(booking),
            None => Err(self.transition_failure(booking_id, BookingStatus::EnRoute).await?),
        }
    }

    pub async fn mark_completed(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        match self.db.mark_booking_completed(booking_id).await? {
            Some(booking) => {
                info!(booking_id = %booking.id, "booking completed");
                Ok(booking)
            }
            None => Err(self.transition_failure(booking_id, BookingStatus::Completed).await?),
        }
    }

    pub async fn cancel_booking(&self, booking_id: Uuid) -> Result<Booking, ServiceError> {
        match self.db.cancel_booking(booking_id).await? {
            Some(booking) => {
                info!(booking_id = %booking.id, "booking cancelled");
                Ok(booking)
            }
            None => Err(self.transition_failure(booking_id, BookingStatus::Cancelled).await?),
        }
    }

    /// A guarded update matched no row: the booking is either missing or in
    /// a state the guard rejects. Re-read to report which.
    async fn transition_failure(
        &self,
        booking_id: Uuid,
        target: BookingStatus,
    ) -> Result<ServiceError, ServiceError> {
        let booking = self
            .db
            .get_booking(booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound(booking_id))?;

        Ok(ServiceError::InvalidTransition {
            entity: "booking",
            from: booking.status.to_str().to_string(),
            to: target.to_str().to_string(),
        })
    }
}
