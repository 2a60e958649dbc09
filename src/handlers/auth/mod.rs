//! Authentication handlers

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

use crate::{handlers::users, middleware::auth::auth_middleware, state::AppState};

/// Authentication routes
pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/refresh", post(handler::refresh_token));

    let protected = Router::new()
        .route("/logout", post(handler::logout))
        .route("/me", get(users::get_me).put(users::update_me))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    public.merge(protected)
}
