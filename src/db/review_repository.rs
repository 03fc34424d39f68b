// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Reviews plus the aggregated user_ratings table

use crate::errors::DomicareError;
use crate::models::{Review, ReviewResponse, UserRating};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct ReviewRepository;

const REVIEW_RESPONSE_SELECT: &str = r#"
    SELECT rv.id, rv.reservation_id, rv.target_id,
           u.first_name AS author_first_name,
           rv.rating, rv.comment, rv.created_at
    FROM reviews rv
    JOIN users u ON u.id = rv.author_id
"#;

impl ReviewRepository {
    /// Create a new review
    /// DOCUMENTATION: One review per reservation, enforced by a unique index
    pub async fn create(
        pool: &SqlitePool,
        reservation_id: i64,
        author_id: i64,
        target_id: i64,
        rating: i64,
        comment: Option<&str>,
    ) -> Result<Review, DomicareError> {
        let result = sqlx::query(
            r#"
            INSERT INTO reviews (reservation_id, author_id, target_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reservation_id)
        .bind(author_id)
        .bind(target_id)
        .bind(rating)
        .bind(comment)
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                DomicareError::AlreadyExists(format!(
                    "Reservation {} has already been reviewed",
                    reservation_id
                ))
            }
            other => {
                log::error!("Failed to create review: {}", other);
                DomicareError::DatabaseError(format!("Create review failed: {}", other))
            }
        })?;

        Self::get_by_id(pool, result.last_insert_rowid()).await
    }

    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Review, DomicareError> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DomicareError::NotFound(format!("Review {}", id)))
    }

    /// Reviews about a user, newest first
    pub async fn list_for_target(
        pool: &SqlitePool,
        target_id: i64,
    ) -> Result<Vec<ReviewResponse>, DomicareError> {
        let sql = format!(
            "{} WHERE rv.target_id = $1 ORDER BY rv.created_at DESC, rv.id DESC",
            REVIEW_RESPONSE_SELECT
        );

        let reviews = sqlx::query_as::<_, ReviewResponse>(&sql)
            .bind(target_id)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch reviews for user {}: {}", target_id, e);
                DomicareError::DatabaseError(format!("Fetch reviews failed: {}", e))
            })?;

        Ok(reviews)
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ReviewResponse>, DomicareError> {
        let sql = format!(
            "{} ORDER BY rv.created_at DESC, rv.id DESC",
            REVIEW_RESPONSE_SELECT
        );
        let reviews = sqlx::query_as::<_, ReviewResponse>(&sql)
            .fetch_all(pool)
            .await?;
        Ok(reviews)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DomicareError> {
        let rows = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(DomicareError::NotFound(format!("Review {}", id)));
        }
        Ok(())
    }

    /// Recompute the aggregate row of a user from the reviews table
    /// The average is stored unrounded; badge thresholds compare against it
    pub async fn refresh_rating(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<UserRating, DomicareError> {
        sqlx::query(
            r#"
            INSERT INTO user_ratings (user_id, average_rating, review_count, updated_at)
            SELECT $1,
                   COALESCE(AVG(rating), 0.0),
                   COUNT(*),
                   $2
            FROM reviews
            WHERE target_id = $1
            ON CONFLICT (user_id) DO UPDATE
            SET average_rating = excluded.average_rating,
                review_count = excluded.review_count,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to refresh rating of user {}: {}", user_id, e);
            DomicareError::DatabaseError(format!("Refresh rating failed: {}", e))
        })?;

        let rating = sqlx::query_as::<_, UserRating>("SELECT * FROM user_ratings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
        Ok(rating)
    }

    pub async fn rating_for(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Option<UserRating>, DomicareError> {
        let rating = sqlx::query_as::<_, UserRating>("SELECT * FROM user_ratings WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
        Ok(rating)
    }

    /// (count, average) over all reviews
    pub async fn global_stats(pool: &SqlitePool) -> Result<(i64, Option<f64>), DomicareError> {
        let stats = sqlx::query_as::<_, (i64, Option<f64>)>(
            "SELECT COUNT(*), AVG(rating) FROM reviews",
        )
        .fetch_one(pool)
        .await?;
        Ok(stats)
    }
}
