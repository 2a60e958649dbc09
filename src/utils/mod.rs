//! Utility functions

pub mod crypto;
pub mod time;
pub mod validation;

pub use crypto::{generate_secure_token, hash_string};
pub use time::{local_midnight_utc, month_bounds, parse_time, today};
pub use validation::{normalize_email, sanitize_string, title_case};
