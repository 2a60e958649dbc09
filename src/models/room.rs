//! Room model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::constants::amenities;

/// Room database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub site: String,
    pub capacity: i32,
    pub amenities: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Check whether the room offers an amenity
    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities.iter().any(|a| a == amenity)
    }
}

/// Return the first amenity key outside the fixed vocabulary, if any
pub fn find_unknown_amenity(keys: &[String]) -> Option<&str> {
    keys.iter()
        .map(String::as_str)
        .find(|key| !amenities::ALL.contains(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_unknown_amenity() {
        let ok = vec!["wifi".to_string(), "tv".to_string()];
        assert_eq!(find_unknown_amenity(&ok), None);

        let bad = vec!["wifi".to_string(), "jacuzzi".to_string()];
        assert_eq!(find_unknown_amenity(&bad), Some("jacuzzi"));
    }
}
