// src/db/stats_repository.rs
// DOCUMENTATION: Aggregate counts for the admin dashboard

use crate::errors::DomicareError;
use crate::models::{LabelCount, ReservationStats, UserStats};
use sqlx::SqlitePool;

pub struct StatsRepository;

impl StatsRepository {
    pub async fn user_stats(pool: &SqlitePool) -> Result<UserStats, DomicareError> {
        let by_role: Vec<LabelCount> = sqlx::query_as(
            "SELECT role AS label, COUNT(*) AS count FROM users GROUP BY role ORDER BY role",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| DomicareError::DatabaseError(e.to_string()))?;

        let (total, active, verified): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(CASE WHEN is_active = 1 THEN 1 ELSE 0 END), 0),
                   COALESCE(SUM(CASE WHEN is_verified = 1 AND role = 'professionnel' THEN 1 ELSE 0 END), 0)
            FROM users
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(|e| DomicareError::DatabaseError(e.to_string()))?;

        Ok(UserStats {
            total,
            by_role,
            active,
            suspended: total - active,
            verified_professionnels: verified,
        })
    }

    pub async fn reservation_stats(pool: &SqlitePool) -> Result<ReservationStats, DomicareError> {
        let by_status: Vec<LabelCount> = sqlx::query_as(
            "SELECT status AS label, COUNT(*) AS count FROM reservations GROUP BY status ORDER BY count DESC, status",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| DomicareError::DatabaseError(e.to_string()))?;

        let total = by_status.iter().map(|c| c.count).sum();

        Ok(ReservationStats { total, by_status })
    }
}
