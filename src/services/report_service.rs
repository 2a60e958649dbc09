//! Report service

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use crate::{
    db::repositories::ReservationRepository,
    error::{AppError, AppResult},
    models::RoomUsage,
    policy::{RejectionReason, Requester},
    services::UserService,
};

/// Reserved time of one user
#[derive(Debug, Clone, Serialize)]
pub struct UserHours {
    pub user_id: i64,
    pub user_name: String,
    pub reservation_count: i64,
    pub total_hours: f64,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Report service
pub struct ReportService;

impl ReportService {
    /// Rooms with the most non-cancelled bookings
    pub async fn most_booked_rooms(pool: &PgPool, limit: u32) -> AppResult<Vec<RoomUsage>> {
        if limit == 0 {
            return Err(AppError::Validation("limit must be positive".to_string()));
        }
        ReservationRepository::room_usage(pool, None, i64::from(limit)).await
    }

    /// Non-cancelled reserved hours of a user; self or admin only
    pub async fn user_hours(
        pool: &PgPool,
        requester: Requester,
        user_id: i64,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> AppResult<UserHours> {
        if requester.user_id != user_id && !requester.is_admin {
            return Err(RejectionReason::InsufficientPermissions(
                "view another user's hours".to_string(),
            )
            .into());
        }

        let user = UserService::get_user_by_id(pool, user_id).await?;
        let (reservation_count, minutes) =
            ReservationRepository::reserved_minutes_for_user(pool, user_id, date_from, date_to)
                .await?;

        Ok(UserHours {
            user_id,
            user_name: user.name,
            reservation_count,
            total_hours: minutes as f64 / 60.0,
            date_from,
            date_to,
        })
    }
}
