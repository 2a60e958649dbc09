//! Logging middleware

use std::time::Instant;

use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use tracing::{info, warn};

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0);

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed with server error"
        );
    } else if is_notable_client_error(status) {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed with client error"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = %duration_ms,
            "Request completed"
        );
    }

    response
}

/// Client errors worth a warning; booking rejections and lookups of missing
/// rows are routine
fn is_notable_client_error(status: StatusCode) -> bool {
    status.is_client_error()
        && !matches!(
            status,
            StatusCode::NOT_FOUND | StatusCode::CONFLICT | StatusCode::BAD_REQUEST
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_notable_client_error() {
        assert!(is_notable_client_error(StatusCode::UNAUTHORIZED));
        assert!(is_notable_client_error(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_notable_client_error(StatusCode::CONFLICT));
        assert!(!is_notable_client_error(StatusCode::BAD_REQUEST));
        assert!(!is_notable_client_error(StatusCode::OK));
    }
}
