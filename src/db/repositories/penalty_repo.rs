//! Penalty repository

use chrono::NaiveDate;
use sqlx::{PgConnection, PgExecutor};

use crate::{error::AppResult, models::UserPenalty};

/// Repository for cancellation penalties
pub struct PenaltyRepository;

impl PenaltyRepository {
    /// Current penalty row of a user, expired or not
    pub async fn find_for_user<'e>(
        executor: impl PgExecutor<'e>,
        user_id: i64,
    ) -> AppResult<Option<UserPenalty>> {
        let penalty =
            sqlx::query_as::<_, UserPenalty>(r#"SELECT * FROM user_penalties WHERE user_id = $1"#)
                .bind(user_id)
                .fetch_optional(executor)
                .await?;

        Ok(penalty)
    }

    /// Record a penalty; an existing one is only ever extended
    pub async fn upsert(
        conn: &mut PgConnection,
        user_id: i64,
        penalized_until: NaiveDate,
        reason: &str,
    ) -> AppResult<UserPenalty> {
        let penalty = sqlx::query_as::<_, UserPenalty>(
            r#"
            INSERT INTO user_penalties (user_id, penalized_until, reason)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET
                penalized_until = GREATEST(user_penalties.penalized_until, EXCLUDED.penalized_until),
                reason = EXCLUDED.reason,
                created_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(penalized_until)
        .bind(reason)
        .fetch_one(conn)
        .await?;

        Ok(penalty)
    }
}
