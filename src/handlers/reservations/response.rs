//! Reservation response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    models::Reservation,
    services::reservation_service::{CancelOutcome, ReservationDashboard},
};

/// Reservation as returned by the API
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: i64,
    pub user_id: i64,
    pub room_id: i64,
    pub reservation_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub cancel_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            room_id: r.room_id,
            reservation_date: r.reservation_date,
            start_time: r.start_time.format("%H:%M").to_string(),
            end_time: r.end_time.format("%H:%M").to_string(),
            status: r.status,
            cancel_reason: r.cancel_reason,
            cancelled_at: r.cancelled_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Reservation list response
#[derive(Debug, Serialize)]
pub struct ReservationsListResponse {
    pub reservations: Vec<ReservationResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// Cancellation response
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: String,
    pub reservation: ReservationResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalized_until: Option<NaiveDate>,
}

impl From<CancelOutcome> for CancelResponse {
    fn from(outcome: CancelOutcome) -> Self {
        let message = match outcome.penalized_until {
            Some(until) => format!(
                "Reservation cancelled. Monthly cancellation limit exceeded; new bookings are blocked until {}",
                until
            ),
            None => "Reservation cancelled".to_string(),
        };
        Self {
            message,
            reservation: outcome.reservation.into(),
            penalized_until: outcome.penalized_until,
        }
    }
}

/// Personal dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub upcoming: Vec<ReservationResponse>,
    pub upcoming_count: i64,
    pub past_count: i64,
    pub cancelled_count: i64,
    pub total_hours: f64,
    pub penalized_until: Option<NaiveDate>,
}

impl From<ReservationDashboard> for DashboardResponse {
    fn from(d: ReservationDashboard) -> Self {
        Self {
            upcoming: d.upcoming.into_iter().map(ReservationResponse::from).collect(),
            upcoming_count: d.upcoming_count,
            past_count: d.past_count,
            cancelled_count: d.cancelled_count,
            total_hours: d.total_hours,
            penalized_until: d.penalized_until,
        }
    }
}
