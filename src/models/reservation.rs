//! Reservation model

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::constants::reservation_status;

/// Reservation database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub room_id: i64,
    pub reservation_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub cancel_reason: Option<String>,
    pub cancelled_by: Option<i64>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Cancelled reservations no longer hold their slot
    pub fn is_cancelled(&self) -> bool {
        self.status == reservation_status::CANCELLED
    }

    /// Parsed status; the database constrains the column to known values
    pub fn status(&self) -> Option<ReservationStatus> {
        self.status.parse().ok()
    }
}

/// Reservation lifecycle.
///
/// New reservations are stored as `confirmed`; `confirmed -> cancelled` is the
/// only transition and `cancelled` is terminal. `pending` is accepted when read
/// back but never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => reservation_status::PENDING,
            Self::Confirmed => reservation_status::CONFIRMED,
            Self::Cancelled => reservation_status::CANCELLED,
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            reservation_status::PENDING => Ok(Self::Pending),
            reservation_status::CONFIRMED => Ok(Self::Confirmed),
            reservation_status::CANCELLED => Ok(Self::Cancelled),
            other => Err(format!("Unknown reservation status: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<ReservationStatus>(), Ok(status));
        }
        assert!("confirmada".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_cancelled_is_terminal() {
        use ReservationStatus::*;

        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Cancelled.can_transition_to(Cancelled));
        assert!(!Confirmed.can_transition_to(Pending));
    }
}
