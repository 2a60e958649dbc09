//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod reports;
pub mod reservations;
pub mod rooms;
pub mod users;

use axum::Router;

use crate::{
    constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    state::AppState,
};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/auth", auth::routes(state.clone()))
        .nest("/users", users::routes(state.clone()))
        .nest("/rooms", rooms::routes(state.clone()))
        .nest("/reservations", reservations::routes(state.clone()))
        .nest("/reports", reports::routes(state))
}

/// Resolve optional paging parameters to a 1-based page and a bounded page size
pub(crate) fn page_params(page: Option<u32>, per_page: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params() {
        assert_eq!(page_params(None, None), (1, DEFAULT_PAGE_SIZE));
        assert_eq!(page_params(Some(0), Some(0)), (1, 1));
        assert_eq!(page_params(Some(3), Some(1000)), (3, MAX_PAGE_SIZE));
    }
}
