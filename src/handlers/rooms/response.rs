//! Room response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{models::Room, policy::TimeSlot};

/// Room as returned by the API
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: i64,
    pub name: String,
    pub site: String,
    pub capacity: i32,
    pub amenities: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Room> for RoomResponse {
    fn from(room: Room) -> Self {
        Self {
            id: room.id,
            name: room.name,
            site: room.site,
            capacity: room.capacity,
            amenities: room.amenities,
            is_active: room.is_active,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

/// Room list response
#[derive(Debug, Serialize)]
pub struct RoomsListResponse {
    pub rooms: Vec<RoomResponse>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// One block in the availability grid
#[derive(Debug, Serialize)]
pub struct SlotResponse {
    pub start_time: String,
    pub end_time: String,
}

impl From<TimeSlot> for SlotResponse {
    fn from(slot: TimeSlot) -> Self {
        Self {
            start_time: slot.start.format("%H:%M").to_string(),
            end_time: slot.end.format("%H:%M").to_string(),
        }
    }
}

/// Availability of a room on a date
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub room_id: i64,
    pub room_name: String,
    pub date: NaiveDate,
    pub is_active: bool,
    pub available: Vec<SlotResponse>,
    pub occupied: Vec<SlotResponse>,
}
