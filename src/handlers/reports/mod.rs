//! Report handlers

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    middleware,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_REPORT_LIMIT, MAX_PAGE_SIZE},
    error::{AppError, AppResult},
    middleware::auth::{AuthenticatedUser, auth_middleware, require_admin},
    models::RoomUsage,
    services::{ReportService, report_service::UserHours},
    state::AppState,
};

/// Most-booked rooms query parameters
#[derive(Debug, Deserialize)]
pub struct MostBookedQuery {
    pub limit: Option<u32>,
}

/// User hours query parameters
#[derive(Debug, Deserialize)]
pub struct UserHoursQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Most-booked rooms response
#[derive(Debug, Serialize)]
pub struct MostBookedRoomsResponse {
    pub rooms: Vec<RoomUsage>,
}

/// Rooms ranked by bookings (admin)
async fn most_booked_rooms(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<MostBookedQuery>,
) -> AppResult<Json<MostBookedRoomsResponse>> {
    require_admin(&auth_user)?;

    let limit = query.limit.unwrap_or(DEFAULT_REPORT_LIMIT).min(MAX_PAGE_SIZE);
    let rooms = ReportService::most_booked_rooms(state.db(), limit).await?;

    Ok(Json(MostBookedRoomsResponse { rooms }))
}

/// Reserved hours of a user (self or admin)
async fn user_hours(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(user_id): Path<i64>,
    Query(query): Query<UserHoursQuery>,
) -> AppResult<Json<UserHours>> {
    if let (Some(from), Some(to)) = (query.date_from, query.date_to) {
        if from > to {
            return Err(AppError::Validation(
                "date_from must not be after date_to".to_string(),
            ));
        }
    }

    let hours = ReportService::user_hours(
        state.db(),
        auth_user.requester(),
        user_id,
        query.date_from,
        query.date_to,
    )
    .await?;

    Ok(Json(hours))
}

/// Report routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/most-booked-rooms", get(most_booked_rooms))
        .route("/user-hours/{user_id}", get(user_hours))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
