// src/db/badge_repository.rs
// DOCUMENTATION: Profile badges

use crate::errors::DomicareError;
use crate::models::{Badge, UserBadge};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct BadgeRepository;

impl BadgeRepository {
    /// Award a badge, no-op if the user already has it
    /// Returns true when the badge was newly awarded
    pub async fn award(pool: &SqlitePool, user_id: i64, badge: Badge) -> Result<bool, DomicareError> {
        let rows = sqlx::query(
            r#"
            INSERT INTO user_badges (user_id, badge, awarded_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, badge) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(badge)
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to award badge to user {}: {}", user_id, e);
            DomicareError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        Ok(rows > 0)
    }

    /// Returns true when a badge was actually removed
    pub async fn revoke(pool: &SqlitePool, user_id: i64, badge: Badge) -> Result<bool, DomicareError> {
        let rows = sqlx::query("DELETE FROM user_badges WHERE user_id = $1 AND badge = $2")
            .bind(user_id)
            .bind(badge)
            .execute(pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<UserBadge>, DomicareError> {
        let badges = sqlx::query_as::<_, UserBadge>(
            "SELECT * FROM user_badges WHERE user_id = $1 ORDER BY awarded_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(badges)
    }

    pub async fn badges_of(pool: &SqlitePool, user_id: i64) -> Result<Vec<Badge>, DomicareError> {
        Ok(Self::list_for_user(pool, user_id)
            .await?
            .into_iter()
            .map(|b| b.badge)
            .collect())
    }
}
