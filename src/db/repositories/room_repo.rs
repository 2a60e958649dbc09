//! Room repository

use sqlx::PgPool;

use crate::{error::AppResult, models::Room};

/// Repository for room database operations
pub struct RoomRepository;

impl RoomRepository {
    /// Create a new room
    pub async fn create(
        pool: &PgPool,
        name: &str,
        site: &str,
        capacity: i32,
        amenities: &[String],
        is_active: bool,
    ) -> AppResult<Room> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (name, site, capacity, amenities, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(site)
        .bind(capacity)
        .bind(amenities)
        .bind(is_active)
        .fetch_one(pool)
        .await?;

        Ok(room)
    }

    /// Find room by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(r#"SELECT * FROM rooms WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(room)
    }

    /// Find a room by its name within a site
    pub async fn find_by_name_and_site(
        pool: &PgPool,
        name: &str,
        site: &str,
    ) -> AppResult<Option<Room>> {
        let room =
            sqlx::query_as::<_, Room>(r#"SELECT * FROM rooms WHERE name = $1 AND site = $2"#)
                .bind(name)
                .bind(site)
                .fetch_optional(pool)
                .await?;

        Ok(room)
    }

    /// Update a room; `None` keeps the stored value
    pub async fn update(
        pool: &PgPool,
        id: i64,
        name: Option<&str>,
        site: Option<&str>,
        capacity: Option<i32>,
        amenities: Option<&[String]>,
        is_active: Option<bool>,
    ) -> AppResult<Room> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms
            SET
                name = COALESCE($2, name),
                site = COALESCE($3, site),
                capacity = COALESCE($4, capacity),
                amenities = COALESCE($5, amenities),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(site)
        .bind(capacity)
        .bind(amenities)
        .bind(is_active)
        .fetch_one(pool)
        .await?;

        Ok(room)
    }

    /// Delete a room; its reservations go with it
    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM rooms WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List rooms with pagination
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        site: Option<&str>,
        is_active: Option<bool>,
        min_capacity: Option<i32>,
    ) -> AppResult<(Vec<Room>, i64)> {
        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT * FROM rooms
            WHERE
                ($1::text IS NULL OR site ILIKE $1)
                AND ($2::boolean IS NULL OR is_active = $2)
                AND ($3::integer IS NULL OR capacity >= $3)
            ORDER BY site, name
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(site)
        .bind(is_active)
        .bind(min_capacity)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM rooms
            WHERE
                ($1::text IS NULL OR site ILIKE $1)
                AND ($2::boolean IS NULL OR is_active = $2)
                AND ($3::integer IS NULL OR capacity >= $3)
            "#,
        )
        .bind(site)
        .bind(is_active)
        .bind(min_capacity)
        .fetch_one(pool)
        .await?;

        Ok((rooms, count))
    }
}
