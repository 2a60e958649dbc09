//! Room service

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    db::repositories::{ReservationRepository, RoomRepository},
    error::{AppError, AppResult},
    models::{Room, find_unknown_amenity},
    policy::{ReservationPolicy, SlotAvailability, available_slots},
    utils::title_case,
};

/// Room fields for create and update; `None` keeps the stored value on update
#[derive(Debug, Default)]
pub struct RoomInput<'a> {
    pub name: Option<&'a str>,
    pub site: Option<&'a str>,
    pub capacity: Option<i32>,
    pub amenities: Option<&'a [String]>,
    pub is_active: Option<bool>,
}

/// Room service for business logic
pub struct RoomService;

impl RoomService {
    /// Get room by ID
    pub async fn get_room(pool: &PgPool, id: i64) -> AppResult<Room> {
        RoomRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", id)))
    }

    /// List rooms with pagination
    pub async fn list_rooms(
        pool: &PgPool,
        page: u32,
        per_page: u32,
        site: Option<&str>,
        is_active: Option<bool>,
        min_capacity: Option<i32>,
    ) -> AppResult<(Vec<Room>, i64)> {
        let offset = (page.saturating_sub(1) as i64) * per_page as i64;
        let limit = per_page as i64;

        RoomRepository::list(pool, offset, limit, site, is_active, min_capacity).await
    }

    /// Create a room (admin)
    pub async fn create_room(pool: &PgPool, input: RoomInput<'_>) -> AppResult<Room> {
        let name = input
            .name
            .map(title_case)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::Validation("Room name is required".to_string()))?;
        let site = input
            .site
            .map(title_case)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Room site is required".to_string()))?;
        let capacity = input
            .capacity
            .ok_or_else(|| AppError::Validation("Room capacity is required".to_string()))?;
        let amenities = input.amenities.unwrap_or_default();
        check_amenities(amenities)?;

        if RoomRepository::find_by_name_and_site(pool, &name, &site)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "A room named '{}' already exists at {}",
                name, site
            )));
        }

        let room = RoomRepository::create(
            pool,
            &name,
            &site,
            capacity,
            amenities,
            input.is_active.unwrap_or(true),
        )
        .await?;

        tracing::info!(room_id = room.id, name = %room.name, site = %room.site, "Room created");

        Ok(room)
    }

    /// Update a room (admin)
    pub async fn update_room(pool: &PgPool, id: i64, input: RoomInput<'_>) -> AppResult<Room> {
        let current = Self::get_room(pool, id).await?;

        let name = input.name.map(title_case);
        let site = input.site.map(title_case);
        if name.as_deref() == Some("") || site.as_deref() == Some("") {
            return Err(AppError::Validation(
                "Room name and site cannot be empty".to_string(),
            ));
        }
        if let Some(amenities) = input.amenities {
            check_amenities(amenities)?;
        }

        if name.is_some() || site.is_some() {
            let target_name = name.as_deref().unwrap_or(&current.name);
            let target_site = site.as_deref().unwrap_or(&current.site);
            if let Some(other) =
                RoomRepository::find_by_name_and_site(pool, target_name, target_site).await?
            {
                if other.id != id {
                    return Err(AppError::AlreadyExists(format!(
                        "A room named '{}' already exists at {}",
                        target_name, target_site
                    )));
                }
            }
        }

        let room = RoomRepository::update(
            pool,
            id,
            name.as_deref(),
            site.as_deref(),
            input.capacity,
            input.amenities,
            input.is_active,
        )
        .await?;

        tracing::info!(room_id = room.id, "Room updated");

        Ok(room)
    }

    /// Delete a room (admin); its reservations cascade
    pub async fn delete_room(pool: &PgPool, id: i64) -> AppResult<()> {
        if !RoomRepository::delete(pool, id).await? {
            return Err(AppError::NotFound(format!("Room {} not found", id)));
        }

        tracing::info!(room_id = id, "Room deleted");

        Ok(())
    }

    /// Free and taken blocks of a room on a date
    pub async fn availability(
        pool: &PgPool,
        policy: &ReservationPolicy,
        id: i64,
        date: NaiveDate,
    ) -> AppResult<(Room, SlotAvailability)> {
        let room = Self::get_room(pool, id).await?;

        if !room.is_active {
            return Ok((room, SlotAvailability::default()));
        }

        let reservations = ReservationRepository::find_for_room_on_date(pool, id, date).await?;
        let slots = available_slots(policy, &reservations);

        Ok((room, slots))
    }
}

fn check_amenities(amenities: &[String]) -> AppResult<()> {
    match find_unknown_amenity(amenities) {
        Some(unknown) => Err(AppError::Validation(format!(
            "Unknown amenity: {}",
            unknown
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_amenities() {
        assert!(check_amenities(&[]).is_ok());
        assert!(check_amenities(&["projector".to_string(), "wifi".to_string()]).is_ok());

        let err = check_amenities(&["hot_tub".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("hot_tub")));
    }
}
