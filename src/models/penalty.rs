//! Cancellation penalty model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A temporary ban on creating reservations
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserPenalty {
    pub id: i64,
    pub user_id: i64,
    pub penalized_until: NaiveDate,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl UserPenalty {
    /// The penalty still applies on `today`
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.penalized_until > today
    }
}
