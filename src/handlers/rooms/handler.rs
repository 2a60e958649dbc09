//! Room handler implementations

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
    services::{RoomService, room_service::RoomInput},
    state::AppState,
};

use super::{
    request::{AvailabilityQuery, CreateRoomRequest, ListRoomsQuery, UpdateRoomRequest},
    response::{AvailabilityResponse, RoomResponse, RoomsListResponse, SlotResponse},
};

/// List rooms (paginated)
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<ListRoomsQuery>,
) -> AppResult<Json<RoomsListResponse>> {
    let (page, per_page) = page_params(query.page, query.per_page);

    let (rooms, total) = RoomService::list_rooms(
        state.db(),
        page,
        per_page,
        query.site.as_deref(),
        query.is_active,
        query.min_capacity,
    )
    .await?;

    Ok(Json(RoomsListResponse {
        rooms: rooms.into_iter().map(RoomResponse::from).collect(),
        total,
        page,
        per_page,
    }))
}

/// Get a room by ID
pub async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RoomResponse>> {
    let room = RoomService::get_room(state.db(), id).await?;
    Ok(Json(room.into()))
}

/// Free and taken blocks of a room on a date
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let (room, slots) =
        RoomService::availability(state.db(), state.policy(), id, query.date).await?;

    Ok(Json(AvailabilityResponse {
        room_id: room.id,
        room_name: room.name,
        date: query.date,
        is_active: room.is_active,
        available: slots.available.into_iter().map(SlotResponse::from).collect(),
        occupied: slots.occupied.into_iter().map(SlotResponse::from).collect(),
    }))
}

/// Create a room (admin)
pub async fn create_room(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<RoomResponse>)> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let room = RoomService::create_room(
        state.db(),
        RoomInput {
            name: Some(&payload.name),
            site: Some(&payload.site),
            capacity: Some(payload.capacity),
            amenities: Some(payload.amenities.as_slice()),
            is_active: payload.is_active,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(room.into())))
}

/// Update a room (admin)
pub async fn update_room(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateRoomRequest>,
) -> AppResult<Json<RoomResponse>> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let room = RoomService::update_room(
        state.db(),
        id,
        RoomInput {
            name: payload.name.as_deref(),
            site: payload.site.as_deref(),
            capacity: payload.capacity,
            amenities: payload.amenities.as_deref(),
            is_active: payload.is_active,
        },
    )
    .await?;

    Ok(Json(room.into()))
}

/// Delete a room (admin)
pub async fn delete_room(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    require_admin(&auth_user)?;
    RoomService::delete_room(state.db(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
