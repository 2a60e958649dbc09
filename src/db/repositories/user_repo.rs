//! User repository

use sqlx::{PgConnection, PgPool};

use crate::{
    error::AppResult,
    models::{User, UserCounts},
};

/// Repository for user database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(
        pool: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
        role: &str,
        is_active: bool,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(is_active)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Lock a user row until the transaction ends; `false` if the user is gone.
    ///
    /// Booking and cancelling take this lock first so per-user quota and
    /// penalty reads see each other's writes.
    pub async fn lock_for_update(conn: &mut PgConnection, id: i64) -> AppResult<bool> {
        let locked: Option<i64> =
            sqlx::query_scalar(r#"SELECT id FROM users WHERE id = $1 FOR UPDATE"#)
                .bind(id)
                .fetch_optional(conn)
                .await?;

        Ok(locked.is_some())
    }

    /// Find user by email, ignoring case
    pub async fn find_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(r#"SELECT * FROM users WHERE LOWER(email) = LOWER($1)"#)
                .bind(email)
                .fetch_optional(pool)
                .await?;

        Ok(user)
    }

    /// Update profile fields; `None` keeps the stored value
    pub async fn update(
        pool: &PgPool,
        id: i64,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Update role and active flag; `None` keeps the stored value
    pub async fn update_access(
        pool: &PgPool,
        id: i64,
        role: Option<&str>,
        is_active: Option<bool>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                role = COALESCE($2, role),
                is_active = COALESCE($3, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(role)
        .bind(is_active)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// List users with pagination
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        search: Option<&str>,
        role: Option<&str>,
        is_active: Option<bool>,
    ) -> AppResult<(Vec<User>, i64)> {
        let search_pattern = search.map(|s| format!("%{}%", s));

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE
                ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
                AND ($2::text IS NULL OR role = $2)
                AND ($3::boolean IS NULL OR is_active = $3)
            ORDER BY created_at DESC, id DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(&search_pattern)
        .bind(role)
        .bind(is_active)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE
                ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
                AND ($2::text IS NULL OR role = $2)
                AND ($3::boolean IS NULL OR is_active = $3)
            "#,
        )
        .bind(&search_pattern)
        .bind(role)
        .bind(is_active)
        .fetch_one(pool)
        .await?;

        Ok((users, count))
    }

    /// Delete a user; reservations and penalties go with it
    pub async fn delete(pool: &PgPool, id: i64) -> AppResult<bool> {
        let result = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count users by status and role
    pub async fn counts(pool: &PgPool) -> AppResult<UserCounts> {
        let counts = sqlx::query_as::<_, UserCounts>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE is_active) AS active,
                COUNT(*) FILTER (WHERE NOT is_active) AS inactive,
                COUNT(*) FILTER (WHERE role = 'admin') AS admins
            FROM users
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(counts)
    }
}
