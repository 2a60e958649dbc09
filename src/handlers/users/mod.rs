//! User management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// User routes; every route requires authentication
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_users).post(handler::create_user))
        .route("/me", get(handler::get_me))
        .route("/stats/count", get(handler::count_users))
        .route(
            "/{id}",
            get(handler::get_user)
                .put(handler::update_user)
                .delete(handler::delete_user),
        )
        .route("/{id}/activate", patch(handler::activate_user))
        .route("/{id}/deactivate", patch(handler::deactivate_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
