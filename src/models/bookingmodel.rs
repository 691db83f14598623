use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "booking_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Pending,
    Assigned,
    EnRoute,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Assigned => "assigned",
            BookingStatus::EnRoute => "en-route",
            BookingStatus::InProgress => "in-progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// `completed` and `cancelled` accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Central transition table. Every status mutation in the crate goes
    /// through this check; nothing writes `bookings.status` directly.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, next) {
            (Pending, Assigned) => true,
            (Assigned, EnRoute) => true,
            // Clock-in drives the booking to in-progress from any
            // non-terminal state, including a still-pending one.
            (Pending | Assigned | EnRoute, InProgress) => true,
            (InProgress, InProgress) => true,
            (Assigned | EnRoute | InProgress, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "frequency", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    OneTime,
    Weekly,
    BiWeekly,
    Monthly,
}

/// Booking attributes captured at intake, before a row exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub service_profile: Option<serde_json::Value>,
    pub frequency: Option<Frequency>,
    pub specific_date: Option<DateTime<Utc>>,
    pub specific_time: Option<String>,
    pub estimated_price: Option<BigDecimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub assigned_to: Option<Uuid>,
    /// Opaque descriptor blob from the intake form (service type, property,
    /// occupancy, access instructions). Validated at the boundary, never
    /// interpreted by the lifecycle core.
    pub service_profile: Option<serde_json::Value>,
    pub frequency: Option<Frequency>,
    pub specific_date: Option<DateTime<Utc>>,
    pub specific_time: Option<String>,
    pub estimated_price: Option<BigDecimal>,
    pub actual_price: Option<BigDecimal>,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Price a derived invoice bills against: the actual price when set,
    /// falling back to the estimate.
    pub fn billable_price(&self) -> Option<&BigDecimal> {
        self.actual_price.as_ref().or(self.estimated_price.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_accept_nothing() {
        use BookingStatus::*;
        for from in [Completed, Cancelled] {
            for to in [Pending, Assigned, EnRoute, InProgress, Completed, Cancelled] {
                assert!(!from.can_transition_to(to), "{:?} -> {:?}", from, to);
            }
        }
    }

    #[test]
    fn happy_path_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(EnRoute));
        assert!(Assigned.can_transition_to(InProgress));
        assert!(EnRoute.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
    }

    #[test]
    fn clock_in_reaches_in_progress_from_pending() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::InProgress));
    }

    #[test]
    fn cancel_from_any_non_terminal() {
        use BookingStatus::*;
        for from in [Pending, Assigned, EnRoute, InProgress] {
            assert!(from.can_transition_to(Cancelled));
        }
    }

    #[test]
    fn no_backwards_transitions() {
        use BookingStatus::*;
        assert!(!InProgress.can_transition_to(Assigned));
        assert!(!Assigned.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(InProgress));
    }
}
