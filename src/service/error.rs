use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Booking {0} not found")]
    BookingNotFound(Uuid),

    #[error("Cleaner {0} not found")]
    CleanerNotFound(Uuid),

    #[error("Customer {0} not found")]
    CustomerNotFound(Uuid),

    #[error("Invoice {0} not found")]
    InvoiceNotFound(Uuid),

    #[error("Payout {0} not found")]
    PayoutNotFound(Uuid),

    #[error("No open clock-in record for booking {booking_id} and cleaner {cleaner_id}")]
    NoOpenTimeRecord { booking_id: Uuid, cleaner_id: Uuid },

    #[error("Booking {booking_id} is not assigned to cleaner {cleaner_id}")]
    NotAssignedCleaner { booking_id: Uuid, cleaner_id: Uuid },

    #[error("Cleaner {cleaner_id} is already clocked in on booking {booking_id}")]
    AlreadyClockedIn { booking_id: Uuid, cleaner_id: Uuid },

    #[error("Invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Database not configured or unreachable")]
    StoreUnavailable,

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        // Pool-level failures mean the store itself is down, which callers
        // must be able to distinguish from a plain query bug.
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                ServiceError::StoreUnavailable
            }
            other => ServiceError::Database(other),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::BookingNotFound(_)
            | ServiceError::CleanerNotFound(_)
            | ServiceError::CustomerNotFound(_)
            | ServiceError::InvoiceNotFound(_)
            | ServiceError::PayoutNotFound(_)
            | ServiceError::NoOpenTimeRecord { .. } => StatusCode::NOT_FOUND,

            ServiceError::NotAssignedCleaner { .. } => StatusCode::FORBIDDEN,

            ServiceError::AlreadyClockedIn { .. }
            | ServiceError::InvalidTransition { .. } => StatusCode::CONFLICT,

            ServiceError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        HttpError::new(error.to_string(), status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_map_to_service_unavailable() {
        let err: ServiceError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let err: ServiceError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        let id = Uuid::new_v4();
        assert_eq!(
            ServiceError::BookingNotFound(id).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::NotAssignedCleaner {
                booking_id: id,
                cleaner_id: id
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServiceError::AlreadyClockedIn {
                booking_id: id,
                cleaner_id: id
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::InvalidTransition {
                entity: "booking",
                from: "completed".to_string(),
                to: "cancelled".to_string()
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }
}
