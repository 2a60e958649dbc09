//! Reservation policy evaluator
//!
//! Pure decision logic for booking and cancelling rooms. Every function in this
//! module works on already-loaded records plus an explicit [`ReservationPolicy`]
//! and an explicit `today`; none of them touch the database, the clock or any
//! shared state. The reservation service is responsible for loading inputs
//! inside a transaction and persisting the outcome.
//!
//! Rule order for creation:
//!
//! 1. past date
//! 2. block length
//! 3. hour alignment
//! 4. working hours
//! 5. advance window
//! 6. slot conflict
//! 7. daily quota
//!
//! The first failing rule decides the [`RejectionReason`].

pub mod cancel;
pub mod create;
pub mod slots;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::constants::{
    DEFAULT_MAX_CANCELLATIONS_PER_MONTH, DEFAULT_MAX_DAILY_RESERVATIONS_PER_USER,
    DEFAULT_MAX_RESERVATION_DAYS_ADVANCE, DEFAULT_PENALTY_DAYS, DEFAULT_RESERVATION_BLOCK_HOURS,
    DEFAULT_WORKING_HOURS_END, DEFAULT_WORKING_HOURS_START,
};
use crate::models::ReservationStatus;

pub use cancel::{check_penalty, evaluate_cancel};
pub use create::evaluate_create;
pub use slots::{SlotAvailability, TimeSlot, available_slots};

/// Reservation rules, passed explicitly into every evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationPolicy {
    pub block_minutes: u32,
    /// Opening and closing hour, `[open, close]`
    pub working_hours: (u32, u32),
    pub max_advance_days: u32,
    pub max_daily_reservations: u32,
    pub max_cancellations_per_month: u32,
    pub penalty_days: u32,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            block_minutes: DEFAULT_RESERVATION_BLOCK_HOURS * 60,
            working_hours: (DEFAULT_WORKING_HOURS_START, DEFAULT_WORKING_HOURS_END),
            max_advance_days: DEFAULT_MAX_RESERVATION_DAYS_ADVANCE,
            max_daily_reservations: DEFAULT_MAX_DAILY_RESERVATIONS_PER_USER,
            max_cancellations_per_month: DEFAULT_MAX_CANCELLATIONS_PER_MONTH,
            penalty_days: DEFAULT_PENALTY_DAYS,
        }
    }
}

/// A booking request as submitted by a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationProposal {
    pub user_id: i64,
    pub room_id: i64,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// A proposal that passed every rule and is ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedReservation {
    pub user_id: i64,
    pub room_id: i64,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub status: ReservationStatus,
}

/// Who is asking for a cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub user_id: i64,
    pub is_admin: bool,
}

/// Outcome of an approved cancellation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelApproval {
    pub reservation_id: i64,
    pub new_status: ReservationStatus,
    /// Set when this cancellation pushes the owner over the monthly cap
    pub penalty_until: Option<NaiveDate>,
}

/// Why a booking or cancellation was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectionReason {
    #[error("{0}")]
    InvalidTimeBlock(String),

    #[error("Reservations cannot be made for past dates")]
    PastDateReservation,

    #[error("Reservations cannot be made more than {max_days} days in advance")]
    AdvanceWindowExceeded { max_days: u32 },

    #[error("The slot {start}-{end} on {date} is already booked")]
    TimeSlotNotAvailable {
        conflicting_id: Option<i64>,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    },

    #[error("You have reached the limit of {limit} reservations per day")]
    ReservationLimitExceeded { limit: u32 },

    #[error("You do not have permission to {0}")]
    InsufficientPermissions(String),

    #[error("{0}")]
    CannotCancelReservation(String),

    #[error("You are penalized until {until} for excessive cancellations")]
    UserPenalized { until: NaiveDate },
}

impl RejectionReason {
    /// Stable machine-readable code for this rejection
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTimeBlock(_) => "INVALID_TIME_BLOCK",
            Self::PastDateReservation => "PAST_DATE_RESERVATION",
            Self::AdvanceWindowExceeded { .. } => "ADVANCE_WINDOW_EXCEEDED",
            Self::TimeSlotNotAvailable { .. } => "TIME_SLOT_NOT_AVAILABLE",
            Self::ReservationLimitExceeded { .. } => "RESERVATION_LIMIT_EXCEEDED",
            Self::InsufficientPermissions(_) => "INSUFFICIENT_PERMISSIONS",
            Self::CannotCancelReservation(_) => "CANNOT_CANCEL_RESERVATION",
            Self::UserPenalized { .. } => "USER_PENALIZED",
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

    use crate::models::Reservation;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    pub fn reservation(
        id: i64,
        user_id: i64,
        room_id: i64,
        day: NaiveDate,
        start: (u32, u32),
        end: (u32, u32),
        status: &str,
    ) -> Reservation {
        let stamp: DateTime<Utc> = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        Reservation {
            id,
            user_id,
            room_id,
            reservation_date: day,
            start_time: time(start.0, start.1),
            end_time: time(end.0, end.1),
            status: status.to_string(),
            cancel_reason: None,
            cancelled_by: None,
            cancelled_at: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }
}
