//! Reservation handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::page_params,
    middleware::auth::{AuthenticatedUser, require_admin},
    services::{ReservationService, reservation_service::ReservationStats},
    state::AppState,
};

use super::{
    request::{CancelReservationRequest, CreateReservationRequest, ListReservationsQuery},
    response::{CancelResponse, DashboardResponse, ReservationResponse, ReservationsListResponse},
};

/// Book a room
pub async fn create_reservation(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    payload.validate()?;
    let (start, end) = payload.times()?;

    let reservation = ReservationService::create(
        state.db(),
        state.policy(),
        auth_user.id,
        payload.room_id,
        payload.reservation_date,
        start,
        end,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(reservation.into())))
}

/// List the authenticated user's reservations
pub async fn list_my_reservations(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListReservationsQuery>,
) -> AppResult<Json<ReservationsListResponse>> {
    let (page, per_page) = page_params(query.page, query.per_page);

    let (reservations, total) =
        ReservationService::list_mine(state.db(), auth_user.id, query.filter(), page, per_page)
            .await?;

    Ok(Json(ReservationsListResponse {
        reservations: reservations.into_iter().map(ReservationResponse::from).collect(),
        total,
        page,
        per_page,
    }))
}

/// Personal dashboard
pub async fn my_dashboard(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<DashboardResponse>> {
    let dashboard = ReservationService::dashboard(state.db(), auth_user.id).await?;
    Ok(Json(dashboard.into()))
}

/// Personal statistics
pub async fn my_stats(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<ReservationStats>> {
    let stats = ReservationService::stats(state.db(), auth_user.id).await?;
    Ok(Json(stats))
}

/// Get a reservation (owner or admin)
pub async fn get_reservation(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = ReservationService::get(state.db(), auth_user.requester(), id).await?;
    Ok(Json(reservation.into()))
}

/// Cancel a reservation (owner or admin)
pub async fn cancel_reservation(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    payload: Option<Json<CancelReservationRequest>>,
) -> AppResult<Json<CancelResponse>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload.validate()?;

    let reason = payload
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let outcome = ReservationService::cancel(
        state.db(),
        state.policy(),
        auth_user.requester(),
        id,
        reason,
    )
    .await?;

    Ok(Json(outcome.into()))
}

/// List all reservations (admin)
pub async fn list_all_reservations(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListReservationsQuery>,
) -> AppResult<Json<ReservationsListResponse>> {
    require_admin(&auth_user)?;

    let (page, per_page) = page_params(query.page, query.per_page);
    let (reservations, total) =
        ReservationService::list(state.db(), &query.filter(), page, per_page).await?;

    Ok(Json(ReservationsListResponse {
        reservations: reservations.into_iter().map(ReservationResponse::from).collect(),
        total,
        page,
        per_page,
    }))
}
