//! Reservation service
//!
//! Loads what the booking rules need, runs them and persists the outcome.
//! Creation runs read-evaluate-insert inside one SERIALIZABLE transaction;
//! the partial unique index on active slots backs it up.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use crate::{
    db::repositories::{
        PenaltyRepository, ReservationFilter, ReservationRepository, RoomRepository,
        UserRepository,
    },
    error::{AppError, AppResult},
    models::{Reservation, ReservationSummary, RoomUsage},
    policy::{
        RejectionReason, ReservationPolicy, ReservationProposal, Requester, check_penalty,
        evaluate_cancel, evaluate_create,
    },
    utils::{local_midnight_utc, month_bounds, today, validation::validate_status},
};

/// Number of upcoming reservations shown on the dashboard
const DASHBOARD_UPCOMING: i64 = 5;

/// Result of a successful cancellation
#[derive(Debug, Clone, Serialize)]
pub struct CancelOutcome {
    pub reservation: Reservation,
    pub penalized_until: Option<NaiveDate>,
}

/// Personal overview
#[derive(Debug, Clone, Serialize)]
pub struct ReservationDashboard {
    pub upcoming: Vec<Reservation>,
    pub upcoming_count: i64,
    pub past_count: i64,
    pub cancelled_count: i64,
    pub total_hours: f64,
    pub penalized_until: Option<NaiveDate>,
}

/// Personal statistics
#[derive(Debug, Clone, Serialize)]
pub struct ReservationStats {
    pub total: i64,
    pub active: i64,
    pub cancelled: i64,
    pub this_month: i64,
    pub total_hours: f64,
    pub most_used_room: Option<RoomUsage>,
}

/// Reservation service for business logic
pub struct ReservationService;

impl ReservationService {
    /// Book a room block for `user_id`
    pub async fn create(
        pool: &PgPool,
        policy: &ReservationPolicy,
        user_id: i64,
        room_id: i64,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> AppResult<Reservation> {
        let room = RoomRepository::find_by_id(pool, room_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room {} not found", room_id)))?;
        if !room.is_active {
            return Err(AppError::RoomNotAvailable(room_id));
        }

        let today = today();
        let proposal = ReservationProposal {
            user_id,
            room_id,
            date,
            start,
            end,
        };

        let mut tx = pool.begin().await?;
        ReservationRepository::set_serializable(&mut tx).await?;
        lock_user(&mut tx, user_id).await?;

        let penalty = PenaltyRepository::find_for_user(&mut *tx, user_id).await?;
        check_penalty(penalty.map(|p| p.penalized_until), today)?;

        let for_room =
            ReservationRepository::find_active_for_room_on_date(&mut tx, room_id, date).await?;
        let for_user =
            ReservationRepository::find_active_for_user_on_date(&mut tx, user_id, date).await?;

        let validated = evaluate_create(&proposal, &for_room, &for_user, policy, today)?;

        let reservation = ReservationRepository::insert(&mut tx, &validated).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::from_booking_write(e, date, start, end))?;

        tracing::info!(
            reservation_id = reservation.id,
            user_id,
            room_id,
            %date,
            %start,
            %end,
            "Reservation created"
        );

        Ok(reservation)
    }

    /// Cancel a reservation on behalf of its owner or an admin
    pub async fn cancel(
        pool: &PgPool,
        policy: &ReservationPolicy,
        requester: Requester,
        id: i64,
        reason: Option<&str>,
    ) -> AppResult<CancelOutcome> {
        let today = today();
        let owner_id = ReservationRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))?
            .user_id;

        // Owner first, then the reservation: the same order booking uses
        let mut tx = pool.begin().await?;
        lock_user(&mut tx, owner_id).await?;

        let reservation = ReservationRepository::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))?;

        let cancellations_this_month = if reservation.user_id == requester.user_id {
            let (first, next) = month_bounds(today);
            let count = ReservationRepository::count_self_cancellations(
                &mut tx,
                reservation.user_id,
                local_midnight_utc(first),
                local_midnight_utc(next),
            )
            .await?;
            u32::try_from(count).unwrap_or(u32::MAX)
        } else {
            0
        };

        let approval = evaluate_cancel(
            &reservation,
            &requester,
            cancellations_this_month,
            policy,
            today,
        )?;

        let cancelled =
            ReservationRepository::cancel(&mut tx, approval.reservation_id, requester.user_id, reason)
                .await?;

        if let Some(until) = approval.penalty_until {
            let penalty_reason = format!(
                "Exceeded {} cancellations in {}",
                policy.max_cancellations_per_month,
                today.format("%Y-%m")
            );
            PenaltyRepository::upsert(&mut tx, reservation.user_id, until, &penalty_reason).await?;
        }

        tx.commit().await?;

        tracing::info!(
            reservation_id = cancelled.id,
            cancelled_by = requester.user_id,
            owner_id = cancelled.user_id,
            "Reservation cancelled"
        );
        if let Some(until) = approval.penalty_until {
            tracing::warn!(
                user_id = cancelled.user_id,
                cancellations = cancellations_this_month + 1,
                penalized_until = %until,
                "User penalized for excessive cancellations"
            );
        }

        Ok(CancelOutcome {
            reservation: cancelled,
            penalized_until: approval.penalty_until,
        })
    }

    /// Get a reservation visible to `requester`
    pub async fn get(pool: &PgPool, requester: Requester, id: i64) -> AppResult<Reservation> {
        let reservation = ReservationRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reservation {} not found", id)))?;

        if reservation.user_id != requester.user_id && !requester.is_admin {
            return Err(RejectionReason::InsufficientPermissions(
                "view this reservation".to_string(),
            )
            .into());
        }

        Ok(reservation)
    }

    /// List reservations with pagination
    pub async fn list(
        pool: &PgPool,
        filter: &ReservationFilter,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<Reservation>, i64)> {
        if let Some(status) = filter.status.as_deref() {
            validate_status(status).map_err(|e| AppError::Validation(e.to_string()))?;
        }
        if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
            if from > to {
                return Err(AppError::Validation(
                    "date_from must not be after date_to".to_string(),
                ));
            }
        }

        let offset = (page.saturating_sub(1) as i64) * per_page as i64;
        let limit = per_page as i64;

        ReservationRepository::list(pool, filter, offset, limit).await
    }

    /// List the requester's own reservations
    pub async fn list_mine(
        pool: &PgPool,
        user_id: i64,
        mut filter: ReservationFilter,
        page: u32,
        per_page: u32,
    ) -> AppResult<(Vec<Reservation>, i64)> {
        filter.user_id = Some(user_id);
        Self::list(pool, &filter, page, per_page).await
    }

    /// Personal overview: next bookings and totals
    pub async fn dashboard(pool: &PgPool, user_id: i64) -> AppResult<ReservationDashboard> {
        let today = today();

        let (upcoming, summary, penalty) = futures::try_join!(
            ReservationRepository::upcoming_for_user(pool, user_id, today, DASHBOARD_UPCOMING),
            ReservationRepository::summary_for_user(pool, user_id, today, month_bounds(today)),
            PenaltyRepository::find_for_user(pool, user_id),
        )?;

        Ok(build_dashboard(upcoming, &summary, penalty.map(|p| p.penalized_until), today))
    }

    /// Personal statistics
    pub async fn stats(pool: &PgPool, user_id: i64) -> AppResult<ReservationStats> {
        let today = today();

        let (summary, mut rooms) = futures::try_join!(
            ReservationRepository::summary_for_user(pool, user_id, today, month_bounds(today)),
            ReservationRepository::room_usage(pool, Some(user_id), 1),
        )?;

        Ok(ReservationStats {
            total: summary.total,
            active: summary.active,
            cancelled: summary.cancelled,
            this_month: summary.this_month,
            total_hours: summary.reserved_hours(),
            most_used_room: rooms.pop(),
        })
    }
}

async fn lock_user(conn: &mut PgConnection, user_id: i64) -> AppResult<()> {
    if !UserRepository::lock_for_update(conn, user_id).await? {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }
    Ok(())
}

fn build_dashboard(
    upcoming: Vec<Reservation>,
    summary: &ReservationSummary,
    penalized_until: Option<NaiveDate>,
    today: NaiveDate,
) -> ReservationDashboard {
    ReservationDashboard {
        upcoming,
        upcoming_count: summary.upcoming,
        past_count: summary.past,
        cancelled_count: summary.cancelled,
        total_hours: summary.reserved_hours(),
        penalized_until: penalized_until.filter(|until| *until > today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_support::{date, reservation};

    #[test]
    fn test_dashboard_hides_expired_penalty() {
        let summary = ReservationSummary {
            upcoming: 2,
            past: 4,
            cancelled: 1,
            reserved_minutes: 360,
            ..Default::default()
        };
        let today = date(2024, 2, 10);
        let upcoming = vec![reservation(1, 1, 1, date(2024, 2, 12), (9, 0), (10, 0), "confirmed")];

        let dashboard = build_dashboard(upcoming.clone(), &summary, Some(date(2024, 2, 9)), today);
        assert_eq!(dashboard.penalized_until, None);
        assert_eq!(dashboard.upcoming.len(), 1);
        assert_eq!(dashboard.past_count, 4);
        assert!((dashboard.total_hours - 6.0).abs() < f64::EPSILON);

        let dashboard = build_dashboard(upcoming, &summary, Some(date(2024, 2, 14)), today);
        assert_eq!(dashboard.penalized_until, Some(date(2024, 2, 14)));
    }

    async fn insert_reservation(
        pool: &PgPool,
        user_id: i64,
        room_id: i64,
        day: NaiveDate,
        hour: u32,
        cancelled: bool,
    ) -> i64 {
        sqlx::query_scalar(
            r#"
            INSERT INTO reservations
                (user_id, room_id, reservation_date, start_time, end_time, status, cancelled_by, cancelled_at)
            VALUES (
                $1, $2, $3, $4, $5,
                CASE WHEN $6 THEN 'cancelled' ELSE 'confirmed' END,
                CASE WHEN $6 THEN $1 END,
                CASE WHEN $6 THEN NOW() END
            )
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(room_id)
        .bind(day)
        .bind(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
        .bind(NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap())
        .bind(cancelled)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at PostgreSQL"]
    async fn test_concurrent_cancellations_still_penalize(pool: PgPool) {
        let user_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO users (name, email, password_hash) VALUES ('Ana', 'ana@example.com', 'x') RETURNING id"#,
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        let room_id: i64 = sqlx::query_scalar(
            r#"INSERT INTO rooms (name, site, capacity) VALUES ('Sala Azul', 'Centro', 6) RETURNING id"#,
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        let day = today() + chrono::Days::new(3);
        insert_reservation(&pool, user_id, room_id, day, 8, true).await;
        insert_reservation(&pool, user_id, room_id, day, 9, true).await;
        let first = insert_reservation(&pool, user_id, room_id, day, 10, false).await;
        let second = insert_reservation(&pool, user_id, room_id, day, 11, false).await;

        let policy = ReservationPolicy::default();
        let owner = Requester {
            user_id,
            is_admin: false,
        };

        let (a, b) = tokio::join!(
            ReservationService::cancel(&pool, &policy, owner, first, None),
            ReservationService::cancel(&pool, &policy, owner, second, None),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        // Third cancellation is free, the fourth is over the monthly limit
        let penalized = [a.penalized_until, b.penalized_until]
            .iter()
            .filter(|p| p.is_some())
            .count();
        assert_eq!(penalized, 1);

        let penalty = PenaltyRepository::find_for_user(&pool, user_id).await.unwrap();
        assert!(penalty.is_some());
    }
}
