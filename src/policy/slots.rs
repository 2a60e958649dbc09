//! Time slots within a working day

use std::fmt;

use chrono::{NaiveTime, TimeDelta};
use serde::Serialize;

use crate::models::Reservation;

use super::ReservationPolicy;

/// Half-open interval `[start, end)` within a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Two slots overlap iff `start < other.end && end > other.start`
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }
}

impl From<&Reservation> for TimeSlot {
    fn from(r: &Reservation) -> Self {
        Self::new(r.start_time, r.end_time)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

/// Bookable blocks of one room on one date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotAvailability {
    pub available: Vec<TimeSlot>,
    pub occupied: Vec<TimeSlot>,
}

/// Every block the policy allows in a day, in order
pub fn day_slots(policy: &ReservationPolicy) -> Vec<TimeSlot> {
    let (open, close) = policy.working_hours;
    let (Some(mut cursor), Some(closing)) = (
        NaiveTime::from_hms_opt(open, 0, 0),
        NaiveTime::from_hms_opt(close, 0, 0),
    ) else {
        return Vec::new();
    };

    let block = TimeDelta::minutes(i64::from(policy.block_minutes));
    let mut slots = Vec::new();
    if block <= TimeDelta::zero() {
        return slots;
    }

    while cursor < closing {
        let end = cursor + block;
        // NaiveTime arithmetic wraps at midnight
        if end <= cursor || end > closing {
            break;
        }
        slots.push(TimeSlot::new(cursor, end));
        cursor = end;
    }
    slots
}

/// Split the day's blocks into free and taken, ignoring cancelled reservations
pub fn available_slots(policy: &ReservationPolicy, reservations: &[Reservation]) -> SlotAvailability {
    let taken: Vec<TimeSlot> = reservations
        .iter()
        .filter(|r| !r.is_cancelled())
        .map(TimeSlot::from)
        .collect();

    let (occupied, available): (Vec<TimeSlot>, Vec<TimeSlot>) = day_slots(policy)
        .into_iter()
        .partition(|slot| taken.iter().any(|t| t.overlaps(slot)));

    SlotAvailability { available, occupied }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_support::{date, reservation, time};

    #[test]
    fn test_overlap_is_half_open() {
        let nine_ten = TimeSlot::new(time(9, 0), time(10, 0));
        let half_past = TimeSlot::new(time(9, 30), time(10, 30));
        let ten_eleven = TimeSlot::new(time(10, 0), time(11, 0));

        assert!(nine_ten.overlaps(&half_past));
        assert!(half_past.overlaps(&nine_ten));
        assert!(!nine_ten.overlaps(&ten_eleven));
        assert!(!ten_eleven.overlaps(&nine_ten));
    }

    #[test]
    fn test_day_slots_cover_working_hours() {
        let slots = day_slots(&ReservationPolicy::default());
        assert_eq!(slots.len(), 10);
        assert_eq!(slots[0].to_string(), "08:00-09:00");
        assert_eq!(slots[9].to_string(), "17:00-18:00");
    }

    #[test]
    fn test_day_slots_with_two_hour_blocks() {
        let policy = ReservationPolicy {
            block_minutes: 120,
            working_hours: (8, 17),
            ..Default::default()
        };
        let slots = day_slots(&policy);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[3].to_string(), "14:00-16:00");
    }

    #[test]
    fn test_available_slots_ignores_cancelled() {
        let day = date(2024, 2, 15);
        let reservations = vec![
            reservation(1, 1, 1, day, (9, 0), (10, 0), "confirmed"),
            reservation(2, 2, 1, day, (11, 0), (12, 0), "cancelled"),
        ];

        let availability = available_slots(&ReservationPolicy::default(), &reservations);
        assert_eq!(availability.occupied, vec![TimeSlot::new(time(9, 0), time(10, 0))]);
        assert_eq!(availability.available.len(), 9);
        assert!(
            availability
                .available
                .contains(&TimeSlot::new(time(11, 0), time(12, 0)))
        );
    }
}
