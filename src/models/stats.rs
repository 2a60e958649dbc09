//! Aggregates computed by the database for dashboards and reports

use serde::Serialize;
use sqlx::FromRow;

/// Booking counts for one room
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoomUsage {
    pub room_id: i64,
    pub room_name: String,
    pub site: String,
    pub reservation_count: i64,
}

/// Per-user reservation totals.
///
/// `reserved_minutes` only counts non-cancelled reservations.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ReservationSummary {
    pub total: i64,
    pub active: i64,
    pub upcoming: i64,
    pub past: i64,
    pub cancelled: i64,
    pub this_month: i64,
    pub reserved_minutes: i64,
}

impl ReservationSummary {
    pub fn reserved_hours(&self) -> f64 {
        self.reserved_minutes as f64 / 60.0
    }
}

/// Account counts for the admin overview
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct UserCounts {
    pub total: i64,
    pub active: i64,
    pub inactive: i64,
    pub admins: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_hours() {
        let summary = ReservationSummary {
            reserved_minutes: 150,
            ..Default::default()
        };
        assert!((summary.reserved_hours() - 2.5).abs() < f64::EPSILON);
    }
}
