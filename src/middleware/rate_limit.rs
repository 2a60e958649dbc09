//! Rate limiting middleware
//!
//! Fixed-window counters in Redis keyed by client IP and path bucket.

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use std::net::SocketAddr;

use crate::{
    constants::{API_BASE_PATH, rate_limits},
    error::AppError,
    state::AppState,
};

/// Rate limit middleware
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let bucket = path_bucket(request.uri().path());
    let (limit, window) = bucket_limits(bucket);

    let key = format!("rate_limit:{}:{}", addr.ip(), bucket);
    let mut redis = state.redis();

    // Fail open when Redis is unreachable
    let count: i64 = match redis.incr(&key, 1).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(error = %e, "Rate limiter unavailable");
            return Ok(next.run(request).await);
        }
    };

    if count == 1 {
        // Set expiry on first request
        let _: Result<(), _> = redis.expire(&key, window).await;
    }

    if count > limit {
        tracing::info!(ip = %addr.ip(), bucket, count, "Rate limit exceeded");
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(request).await)
}

/// Get bucket for path (for grouping similar endpoints)
fn path_bucket(path: &str) -> &'static str {
    let path = path.strip_prefix(API_BASE_PATH).unwrap_or(path);
    if path.starts_with("/auth") {
        "auth"
    } else if path.starts_with("/reservations") {
        "reservations"
    } else {
        "general"
    }
}

/// Request budget and window in seconds for a bucket
fn bucket_limits(bucket: &str) -> (i64, i64) {
    match bucket {
        "auth" => (rate_limits::AUTH_MAX_REQUESTS, rate_limits::AUTH_WINDOW_SECS),
        "reservations" => (
            rate_limits::RESERVATION_MAX_REQUESTS,
            rate_limits::RESERVATION_WINDOW_SECS,
        ),
        _ => (
            rate_limits::GENERAL_MAX_REQUESTS,
            rate_limits::GENERAL_WINDOW_SECS,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_bucket() {
        assert_eq!(path_bucket("/api/v1/auth/login"), "auth");
        assert_eq!(path_bucket("/api/v1/reservations/me"), "reservations");
        assert_eq!(path_bucket("/api/v1/rooms/3"), "general");
        assert_eq!(path_bucket("/health"), "general");
    }

    #[test]
    fn test_auth_bucket_is_strictest() {
        let (auth, _) = bucket_limits("auth");
        let (general, _) = bucket_limits("general");
        assert!(auth < general);
    }
}
