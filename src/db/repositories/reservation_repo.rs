//! Reservation repository
//!
//! Functions taking a `PgConnection` are meant to run inside the booking
//! transaction opened by the reservation service.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::{
    error::{AppError, AppResult},
    models::{Reservation, ReservationSummary, RoomUsage},
    policy::ValidatedReservation,
};

/// Optional filters for reservation listings
#[derive(Debug, Clone, Default)]
pub struct ReservationFilter {
    pub user_id: Option<i64>,
    pub room_id: Option<i64>,
    pub status: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Repository for reservation database operations
pub struct ReservationRepository;

impl ReservationRepository {
    /// Raise the current transaction to SERIALIZABLE isolation
    pub async fn set_serializable(conn: &mut PgConnection) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Non-cancelled reservations of a room on a date
    pub async fn find_active_for_room_on_date(
        conn: &mut PgConnection,
        room_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE room_id = $1 AND reservation_date = $2 AND status <> 'cancelled'
            ORDER BY start_time
            "#,
        )
        .bind(room_id)
        .bind(date)
        .fetch_all(conn)
        .await?;

        Ok(reservations)
    }

    /// Non-cancelled reservations of a user on a date
    pub async fn find_active_for_user_on_date(
        conn: &mut PgConnection,
        user_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE user_id = $1 AND reservation_date = $2 AND status <> 'cancelled'
            ORDER BY start_time
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(conn)
        .await?;

        Ok(reservations)
    }

    /// Insert an evaluated reservation; losing the slot to a concurrent booking is a rejection
    pub async fn insert(
        conn: &mut PgConnection,
        reservation: &ValidatedReservation,
    ) -> AppResult<Reservation> {
        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (user_id, room_id, reservation_date, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(reservation.user_id)
        .bind(reservation.room_id)
        .bind(reservation.date)
        .bind(reservation.start)
        .bind(reservation.end)
        .bind(reservation.status.as_str())
        .fetch_one(conn)
        .await
        .map_err(|e| {
            AppError::from_booking_write(e, reservation.date, reservation.start, reservation.end)
        })?;

        Ok(created)
    }

    /// Find reservation by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Reservation>> {
        let reservation =
            sqlx::query_as::<_, Reservation>(r#"SELECT * FROM reservations WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(reservation)
    }

    /// Find reservation by ID and lock the row until the transaction ends
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: i64,
    ) -> AppResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"SELECT * FROM reservations WHERE id = $1 FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(reservation)
    }

    /// Cancellations a user made on their own reservations in `[from, to)`
    pub async fn count_self_cancellations(
        conn: &mut PgConnection,
        user_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE user_id = $1
              AND cancelled_by = $1
              AND status = 'cancelled'
              AND cancelled_at >= $2
              AND cancelled_at < $3
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_one(conn)
        .await?;

        Ok(count)
    }

    /// Mark a reservation cancelled
    pub async fn cancel(
        conn: &mut PgConnection,
        id: i64,
        cancelled_by: i64,
        reason: Option<&str>,
    ) -> AppResult<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET
                status = 'cancelled',
                cancel_reason = $3,
                cancelled_by = $2,
                cancelled_at = NOW(),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cancelled_by)
        .bind(reason)
        .fetch_one(conn)
        .await?;

        Ok(reservation)
    }

    /// List reservations with filters and pagination, newest date first
    pub async fn list(
        pool: &PgPool,
        filter: &ReservationFilter,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Reservation>, i64)> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE
                ($1::bigint IS NULL OR user_id = $1)
                AND ($2::bigint IS NULL OR room_id = $2)
                AND ($3::text IS NULL OR status = $3)
                AND ($4::date IS NULL OR reservation_date >= $4)
                AND ($5::date IS NULL OR reservation_date <= $5)
            ORDER BY reservation_date DESC, start_time DESC
            OFFSET $6 LIMIT $7
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.room_id)
        .bind(filter.status.as_deref())
        .bind(filter.date_from)
        .bind(filter.date_to)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE
                ($1::bigint IS NULL OR user_id = $1)
                AND ($2::bigint IS NULL OR room_id = $2)
                AND ($3::text IS NULL OR status = $3)
                AND ($4::date IS NULL OR reservation_date >= $4)
                AND ($5::date IS NULL OR reservation_date <= $5)
            "#,
        )
        .bind(filter.user_id)
        .bind(filter.room_id)
        .bind(filter.status.as_deref())
        .bind(filter.date_from)
        .bind(filter.date_to)
        .fetch_one(pool)
        .await?;

        Ok((reservations, count))
    }

    /// Every reservation of a room on a date, cancelled ones included
    pub async fn find_for_room_on_date(
        pool: &PgPool,
        room_id: i64,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE room_id = $1 AND reservation_date = $2
            ORDER BY start_time
            "#,
        )
        .bind(room_id)
        .bind(date)
        .fetch_all(pool)
        .await?;

        Ok(reservations)
    }

    /// Next non-cancelled reservations of a user from `today` on
    pub async fn upcoming_for_user(
        pool: &PgPool,
        user_id: i64,
        today: NaiveDate,
        limit: i64,
    ) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE user_id = $1 AND reservation_date >= $2 AND status <> 'cancelled'
            ORDER BY reservation_date, start_time
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(today)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(reservations)
    }

    /// Totals for one user; `month` is the `[first, next_first)` date range
    pub async fn summary_for_user(
        pool: &PgPool,
        user_id: i64,
        today: NaiveDate,
        month: (NaiveDate, NaiveDate),
    ) -> AppResult<ReservationSummary> {
        let summary = sqlx::query_as::<_, ReservationSummary>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status <> 'cancelled') AS active,
                COUNT(*) FILTER (WHERE status <> 'cancelled' AND reservation_date >= $2) AS upcoming,
                COUNT(*) FILTER (WHERE status <> 'cancelled' AND reservation_date < $2) AS past,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled,
                COUNT(*) FILTER (WHERE reservation_date >= $3 AND reservation_date < $4) AS this_month,
                COALESCE(
                    SUM(EXTRACT(EPOCH FROM (end_time - start_time)) / 60)
                        FILTER (WHERE status <> 'cancelled'),
                    0
                )::BIGINT AS reserved_minutes
            FROM reservations
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(today)
        .bind(month.0)
        .bind(month.1)
        .fetch_one(pool)
        .await?;

        Ok(summary)
    }

    /// Non-cancelled reservations and reserved minutes of a user in an optional date range
    pub async fn reserved_minutes_for_user(
        pool: &PgPool,
        user_id: i64,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> AppResult<(i64, i64)> {
        let totals: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(EXTRACT(EPOCH FROM (end_time - start_time)) / 60), 0)::BIGINT
            FROM reservations
            WHERE user_id = $1
              AND status <> 'cancelled'
              AND ($2::date IS NULL OR reservation_date >= $2)
              AND ($3::date IS NULL OR reservation_date <= $3)
            "#,
        )
        .bind(user_id)
        .bind(date_from)
        .bind(date_to)
        .fetch_one(pool)
        .await?;

        Ok(totals)
    }

    /// Rooms ranked by non-cancelled bookings; `user_id` restricts to one booker
    pub async fn room_usage(
        pool: &PgPool,
        user_id: Option<i64>,
        limit: i64,
    ) -> AppResult<Vec<RoomUsage>> {
        let usage = sqlx::query_as::<_, RoomUsage>(
            r#"
            SELECT
                r.id AS room_id,
                r.name AS room_name,
                r.site AS site,
                COUNT(res.id) AS reservation_count
            FROM reservations res
            JOIN rooms r ON r.id = res.room_id
            WHERE res.status <> 'cancelled'
              AND ($1::bigint IS NULL OR res.user_id = $1)
            GROUP BY r.id, r.name, r.site
            ORDER BY reservation_count DESC, r.id
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(usage)
    }
}
