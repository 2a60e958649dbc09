//! Room request DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::constants::{MAX_NAME_LENGTH, MAX_ROOM_CAPACITY, MIN_NAME_LENGTH, MIN_ROOM_CAPACITY};

/// Create room request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH))]
    pub name: String,

    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH))]
    pub site: String,

    #[validate(range(min = MIN_ROOM_CAPACITY, max = MAX_ROOM_CAPACITY))]
    pub capacity: i32,

    #[serde(default)]
    pub amenities: Vec<String>,

    pub is_active: Option<bool>,
}

/// Update room request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH))]
    pub name: Option<String>,

    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH))]
    pub site: Option<String>,

    #[validate(range(min = MIN_ROOM_CAPACITY, max = MAX_ROOM_CAPACITY))]
    pub capacity: Option<i32>,

    pub amenities: Option<Vec<String>>,

    pub is_active: Option<bool>,
}

/// List rooms query parameters
#[derive(Debug, Deserialize)]
pub struct ListRoomsQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub site: Option<String>,
    pub is_active: Option<bool>,
    pub min_capacity: Option<i32>,
}

/// Availability query parameters
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}
