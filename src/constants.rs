//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT access token expiry in minutes
pub const DEFAULT_JWT_EXPIRY_MINUTES: i64 = 30;

/// Default refresh token expiry in days
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Length of opaque refresh tokens
pub const REFRESH_TOKEN_LENGTH: usize = 48;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 50;

/// Display name minimum length
pub const MIN_NAME_LENGTH: u64 = 2;

/// Display name maximum length
pub const MAX_NAME_LENGTH: u64 = 100;

// =============================================================================
// RESERVATION DEFAULTS
// =============================================================================

/// Length of a reservation block in hours
pub const DEFAULT_RESERVATION_BLOCK_HOURS: u32 = 1;

/// How many days ahead a reservation may be booked
pub const DEFAULT_MAX_RESERVATION_DAYS_ADVANCE: u32 = 30;

/// Non-cancelled reservations a user may hold on one day
pub const DEFAULT_MAX_DAILY_RESERVATIONS_PER_USER: u32 = 3;

/// Cancellations per calendar month before a penalty applies
pub const DEFAULT_MAX_CANCELLATIONS_PER_MONTH: u32 = 3;

/// Length of a cancellation penalty in days
pub const DEFAULT_PENALTY_DAYS: u32 = 7;

/// First bookable hour of the day
pub const DEFAULT_WORKING_HOURS_START: u32 = 8;

/// Hour at which the last block must end
pub const DEFAULT_WORKING_HOURS_END: u32 = 18;

/// Maximum length of a cancellation reason
pub const MAX_CANCEL_REASON_LENGTH: u64 = 200;

// =============================================================================
// ROOMS
// =============================================================================

/// Minimum room capacity
pub const MIN_ROOM_CAPACITY: i32 = 1;

/// Maximum room capacity
pub const MAX_ROOM_CAPACITY: i32 = 50;

/// Amenity keys a room may declare
pub mod amenities {
    pub const PROJECTOR: &str = "projector";
    pub const WIFI: &str = "wifi";
    pub const WHITEBOARD: &str = "whiteboard";
    pub const AIR_CONDITIONING: &str = "air_conditioning";
    pub const VIDEO_CONFERENCE: &str = "video_conference";
    pub const SOUND: &str = "sound";
    pub const COMPUTER: &str = "computer";
    pub const TV: &str = "tv";

    /// The full amenity vocabulary
    pub const ALL: &[&str] = &[
        PROJECTOR,
        WIFI,
        WHITEBOARD,
        AIR_CONDITIONING,
        VIDEO_CONFERENCE,
        SOUND,
        COMPUTER,
        TV,
    ];
}

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const USER: &str = "user";

    /// All user roles
    pub const ALL: &[&str] = &[ADMIN, USER];
}

// =============================================================================
// RESERVATION STATUSES
// =============================================================================

/// Reservation status identifiers as stored in the database
pub mod reservation_status {
    pub const PENDING: &str = "pending";
    pub const CONFIRMED: &str = "confirmed";
    pub const CANCELLED: &str = "cancelled";

    pub const ALL: &[&str] = &[PENDING, CONFIRMED, CANCELLED];
}

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Auth endpoint - max requests
    pub const AUTH_MAX_REQUESTS: i64 = 5;
    /// Auth endpoint - window in seconds
    pub const AUTH_WINDOW_SECS: i64 = 60;

    /// Reservation endpoint - max requests
    pub const RESERVATION_MAX_REQUESTS: i64 = 30;
    /// Reservation endpoint - window in seconds
    pub const RESERVATION_WINDOW_SECS: i64 = 60;

    /// General API - max requests
    pub const GENERAL_MAX_REQUESTS: i64 = 100;
    /// General API - window in seconds
    pub const GENERAL_WINDOW_SECS: i64 = 60;
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default number of rooms in the most-booked report
pub const DEFAULT_REPORT_LIMIT: u32 = 5;
