//! Custom error types and handling
//!
//! This module defines the application's error types and implements
//! conversion to HTTP responses for the Axum framework.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::policy::RejectionReason;

/// Postgres SQLSTATE for serialization failures under SERIALIZABLE isolation
const SERIALIZATION_FAILURE: &str = "40001";

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Your account is inactive. Contact an administrator.")]
    InactiveUser,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Room {0} is not available")]
    RoomNotAvailable(i64),

    // Business rule rejections
    #[error(transparent)]
    Rejected(#[from] RejectionReason),

    // Database errors
    #[error("Database error: {0}")]
    Database(String),

    // External service errors
    #[error("Redis error: {0}")]
    Redis(String),

    // Rate limiting
    #[error("Too many requests")]
    TooManyRequests,

    // Internal errors
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details in response
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InactiveUser => "INACTIVE_USER",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::RoomNotAvailable(_) => "ROOM_NOT_AVAILABLE",
            Self::Rejected(reason) => reason.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
            Self::Redis(_) => "REDIS_ERROR",
            Self::TooManyRequests => "TOO_MANY_REQUESTS",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::InvalidToken | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InactiveUser => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AlreadyExists(_) => StatusCode::CONFLICT,
            Self::RoomNotAvailable(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(reason) => rejection_status(reason),
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Database(_) | Self::Redis(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// HTTP status for each business rule rejection
fn rejection_status(reason: &RejectionReason) -> StatusCode {
    match reason {
        RejectionReason::InvalidTimeBlock(_)
        | RejectionReason::PastDateReservation
        | RejectionReason::AdvanceWindowExceeded { .. }
        | RejectionReason::ReservationLimitExceeded { .. }
        | RejectionReason::CannotCancelReservation(_) => StatusCode::BAD_REQUEST,
        RejectionReason::TimeSlotNotAvailable { .. } => StatusCode::CONFLICT,
        RejectionReason::InsufficientPermissions(_) | RejectionReason::UserPenalized { .. } => {
            StatusCode::FORBIDDEN
        }
    }
}

/// Structured details attached to a rejection, if it has any
fn rejection_details(reason: &RejectionReason) -> Option<serde_json::Value> {
    match reason {
        RejectionReason::TimeSlotNotAvailable {
            conflicting_id,
            date,
            start,
            end,
        } => Some(serde_json::json!({
            "conflicting_reservation_id": conflicting_id,
            "date": date,
            "start_time": start.format("%H:%M").to_string(),
            "end_time": end.format("%H:%M").to_string(),
        })),
        RejectionReason::UserPenalized { until } => {
            Some(serde_json::json!({ "penalized_until": until }))
        }
        _ => None,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors but don't expose details to clients
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "A database error occurred".to_string()
            }
            AppError::Redis(e) => {
                tracing::error!("Redis error: {}", e);
                "A cache error occurred".to_string()
            }
            AppError::Rejected(reason) => {
                tracing::debug!(code = reason.error_code(), "Request rejected: {}", reason);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let details = match &self {
            AppError::Rejected(reason) => rejection_details(reason),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: self.error_code().to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl AppError {
    /// Map a failed booking write.
    ///
    /// A unique violation on the slot index or a serialization failure means a
    /// concurrent booking took the slot first.
    pub fn from_booking_write(
        err: sqlx::Error,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Self {
        if is_slot_race(&err) {
            tracing::info!(%date, %start, %end, "Slot taken by a concurrent booking");
            AppError::Rejected(RejectionReason::TimeSlotNotAvailable {
                conflicting_id: None,
                date,
                start,
                end,
            })
        } else {
            err.into()
        }
    }
}

fn is_slot_race(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() || db_err.code().as_deref() == Some(SERIALIZATION_FAILURE)
        }
        _ => false,
    }
}

// Implement From for common error types
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Check for unique constraint violations
                if db_err.is_unique_violation() {
                    AppError::AlreadyExists("Resource already exists".to_string())
                } else {
                    AppError::Database(db_err.to_string())
                }
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Redis(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(reason: RejectionReason) -> AppError {
        AppError::from(reason)
    }

    #[test]
    fn test_rejection_status_codes() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

        let cases = [
            (RejectionReason::InvalidTimeBlock("x".into()), StatusCode::BAD_REQUEST),
            (RejectionReason::PastDateReservation, StatusCode::BAD_REQUEST),
            (RejectionReason::AdvanceWindowExceeded { max_days: 30 }, StatusCode::BAD_REQUEST),
            (
                RejectionReason::TimeSlotNotAvailable {
                    conflicting_id: Some(1),
                    date: day,
                    start: nine,
                    end: ten,
                },
                StatusCode::CONFLICT,
            ),
            (RejectionReason::ReservationLimitExceeded { limit: 3 }, StatusCode::BAD_REQUEST),
            (RejectionReason::InsufficientPermissions("x".into()), StatusCode::FORBIDDEN),
            (RejectionReason::CannotCancelReservation("x".into()), StatusCode::BAD_REQUEST),
            (RejectionReason::UserPenalized { until: day }, StatusCode::FORBIDDEN),
        ];

        for (reason, status) in cases {
            assert_eq!(rejected(reason).status_code(), status);
        }
    }

    #[test]
    fn test_rejection_message_is_surfaced_verbatim() {
        let err = rejected(RejectionReason::ReservationLimitExceeded { limit: 3 });
        assert_eq!(err.to_string(), "You have reached the limit of 3 reservations per day");
        assert_eq!(err.error_code(), "RESERVATION_LIMIT_EXCEEDED");
    }

    #[test]
    fn test_booking_write_without_race_is_a_database_error() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

        let err = AppError::from_booking_write(sqlx::Error::PoolTimedOut, day, nine, ten);
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_internal_errors_map_to_500() {
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Database("down".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
