//! User handler implementations

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
    models::UserCounts,
    services::{
        UserService,
        user_service::{NewUser, ProfileUpdate},
    },
    state::AppState,
};

use super::{
    request::{AdminUpdateUserRequest, CreateUserRequest, ListUsersQuery, UpdateProfileRequest},
    response::{UserResponse, UsersListResponse},
};

/// Get the authenticated user's profile
pub async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserService::get_user_by_id(state.db(), auth_user.id).await?;
    Ok(Json(user.into()))
}

/// Update the authenticated user's profile
pub async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    payload.validate()?;

    let current = UserService::get_user_by_id(state.db(), auth_user.id).await?;
    let user = UserService::update_own_profile(
        state.db(),
        &current,
        ProfileUpdate {
            name: payload.name.as_deref(),
            email: payload.email.as_deref(),
            current_password: payload.current_password.as_deref(),
            new_password: payload.new_password.as_deref(),
            role: payload.role.as_deref(),
            is_active: payload.is_active,
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// Get a specific user by ID (self or admin)
pub async fn get_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user =
        UserService::get_visible_user(state.db(), auth_user.id, auth_user.is_admin(), id).await?;
    Ok(Json(user.into()))
}

/// List all users (admin, paginated)
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<UsersListResponse>> {
    require_admin(&auth_user)?;

    let (page, per_page) = page_params(query.page, query.per_page);
    let (users, total) = UserService::list_users(
        state.db(),
        page,
        per_page,
        query.search.as_deref(),
        query.role.as_deref(),
        query.is_active,
    )
    .await?;

    Ok(Json(UsersListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
        page,
        per_page,
    }))
}

/// Create a user (admin)
pub async fn create_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let user = UserService::create_user(
        state.db(),
        NewUser {
            name: &payload.name,
            email: &payload.email,
            password: &payload.password,
            role: &payload.role,
            is_active: payload.is_active,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Update a user (admin)
pub async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&auth_user)?;
    payload.validate()?;

    let user = UserService::update_user(
        state.db(),
        auth_user.id,
        id,
        ProfileUpdate {
            name: payload.name.as_deref(),
            email: payload.email.as_deref(),
            current_password: None,
            new_password: payload.password.as_deref(),
            role: payload.role.as_deref(),
            is_active: payload.is_active,
        },
    )
    .await?;

    Ok(Json(user.into()))
}

/// Activate a user (admin)
pub async fn activate_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&auth_user)?;
    let user = UserService::set_active(state.db(), auth_user.id, id, true).await?;
    Ok(Json(user.into()))
}

/// Deactivate a user (admin)
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&auth_user)?;
    let user = UserService::set_active(state.db(), auth_user.id, id, false).await?;
    Ok(Json(user.into()))
}

/// Delete a user (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    require_admin(&auth_user)?;
    UserService::delete_user(state.db(), auth_user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Account counts (admin)
pub async fn count_users(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<Json<UserCounts>> {
    require_admin(&auth_user)?;
    Ok(Json(UserService::counts(state.db()).await?))
}
