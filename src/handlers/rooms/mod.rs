//! Room handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Room routes; reads are public, writes need an admin
pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(handler::list_rooms))
        .route("/{id}", get(handler::get_room))
        .route("/{id}/availability", get(handler::get_availability));

    let admin = Router::new()
        .route("/", post(handler::create_room))
        .route("/{id}", put(handler::update_room).delete(handler::delete_room))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(admin)
}
