//! Reservation handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Reservation routes; every route requires authentication
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handler::create_reservation).get(handler::list_all_reservations),
        )
        .route("/me", get(handler::list_my_reservations))
        .route("/me/dashboard", get(handler::my_dashboard))
        .route("/me/stats", get(handler::my_stats))
        .route("/{id}", get(handler::get_reservation))
        .route("/{id}/cancel", post(handler::cancel_reservation))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
