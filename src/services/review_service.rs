// src/services/review_service.rs
// DOCUMENTATION: Reviews and rating aggregation
// PURPOSE: Every insert or delete refreshes user_ratings and the top_note badge

use crate::db::{ReservationRepository, ReviewRepository};
use crate::errors::DomicareError;
use crate::models::{
    CreateReviewRequest, ReservationStatus, Review, ReviewResponse, User, UserRating,
};
use crate::services::BadgeService;
use sqlx::SqlitePool;

pub struct ReviewService;

impl ReviewService {
    pub async fn create(
        pool: &SqlitePool,
        author: &User,
        req: CreateReviewRequest,
    ) -> Result<Review, DomicareError> {
        let reservation = ReservationRepository::get_by_id(pool, req.reservation_id).await?;

        if reservation.famille_id != author.id {
            return Err(DomicareError::Forbidden(
                "Only the famille of this reservation can review it".to_string(),
            ));
        }

        if reservation.status != ReservationStatus::Terminee {
            return Err(DomicareError::InvalidInput(
                "Only completed reservations can be reviewed".to_string(),
            ));
        }

        let comment = req
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let review = ReviewRepository::create(
            pool,
            reservation.id,
            author.id,
            reservation.professionnel_id,
            req.rating,
            comment,
        )
        .await?;

        let rating = Self::refresh(pool, review.target_id).await?;
        log::info!(
            "Review {} on user {}: now {:.2} over {} reviews",
            review.id,
            review.target_id,
            rating.average_rating,
            rating.review_count
        );

        Ok(review)
    }

    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<Vec<ReviewResponse>, DomicareError> {
        ReviewRepository::list_for_target(pool, user_id).await
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<ReviewResponse>, DomicareError> {
        ReviewRepository::list_all(pool).await
    }

    /// Moderation delete
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), DomicareError> {
        let review = ReviewRepository::get_by_id(pool, id).await?;
        ReviewRepository::delete(pool, id).await?;
        Self::refresh(pool, review.target_id).await?;
        log::info!("Deleted review {} on user {}", id, review.target_id);
        Ok(())
    }

    async fn refresh(pool: &SqlitePool, user_id: i64) -> Result<UserRating, DomicareError> {
        let rating = ReviewRepository::refresh_rating(pool, user_id).await?;
        BadgeService::evaluate_top_note(pool, &rating).await?;
        Ok(rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{BadgeRepository, UserRepository};
    use crate::models::Badge;
    use crate::test_support::{
        completed_reservation, pending_reservation, seed_famille, seed_professionnel, test_pool,
    };

    fn review(reservation_id: i64, rating: i64) -> CreateReviewRequest {
        CreateReviewRequest {
            reservation_id,
            rating,
            comment: Some("Très attentionnée".to_string()),
        }
    }

    #[tokio::test]
    async fn test_one_review_per_completed_reservation() {
        let pool = test_pool().await;
        let pro = seed_professionnel(&pool, "pro@example.fr", 20.0).await;
        let famille = seed_famille(&pool, "famille@example.fr").await;
        let reservation = completed_reservation(&pool, &famille, &pro).await;

        let created = ReviewService::create(&pool, &famille, review(reservation.id, 4))
            .await
            .unwrap();
        assert_eq!(created.target_id, pro.id);

        let duplicate = ReviewService::create(&pool, &famille, review(reservation.id, 5)).await;
        assert!(matches!(duplicate, Err(DomicareError::AlreadyExists(_))));

        let listed = ReviewService::list_for_user(&pool, pro.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].author_first_name, "Famille");

        let rating = ReviewRepository::rating_for(&pool, pro.id).await.unwrap().unwrap();
        assert_eq!(rating.review_count, 1);
        assert_eq!(rating.average_rating, 4.0);
    }

    #[tokio::test]
    async fn test_average_is_stored_unrounded() {
        let pool = test_pool().await;
        let pro = seed_professionnel(&pool, "pro@example.fr", 20.0).await;

        for (i, stars) in [5, 5, 4].into_iter().enumerate() {
            let famille = seed_famille(&pool, &format!("famille{}@example.fr", i)).await;
            let reservation = completed_reservation(&pool, &famille, &pro).await;
            ReviewService::create(&pool, &famille, review(reservation.id, stars))
                .await
                .unwrap();
        }

        let rating = ReviewRepository::rating_for(&pool, pro.id).await.unwrap().unwrap();
        assert!((rating.average_rating - 14.0 / 3.0).abs() < 1e-9);

        let pro = UserRepository::get_by_id(&pool, pro.id).await.unwrap();
        let profile = pro.to_public(Some(&rating), Vec::new());
        assert_eq!(profile.average_rating, Some(4.67));
    }

    #[tokio::test]
    async fn test_only_the_famille_reviews_completed_work() {
        let pool = test_pool().await;
        let pro = seed_professionnel(&pool, "pro@example.fr", 20.0).await;
        let famille = seed_famille(&pool, "famille@example.fr").await;
        let reservation = completed_reservation(&pool, &famille, &pro).await;

        let by_pro = ReviewService::create(&pool, &pro, review(reservation.id, 5)).await;
        assert!(matches!(by_pro, Err(DomicareError::Forbidden(_))));

        let pending = pending_reservation(&pool, &famille, &pro).await;
        let early = ReviewService::create(&pool, &famille, review(pending.id, 5)).await;
        assert!(matches!(early, Err(DomicareError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_top_note_follows_reviews() {
        let pool = test_pool().await;
        let pro = seed_professionnel(&pool, "pro@example.fr", 20.0).await;

        let mut review_ids = Vec::new();
        for i in 0..5 {
            let famille = seed_famille(&pool, &format!("famille{}@example.fr", i)).await;
            let reservation = completed_reservation(&pool, &famille, &pro).await;
            let created = ReviewService::create(&pool, &famille, review(reservation.id, 5))
                .await
                .unwrap();
            review_ids.push(created.id);
        }

        let badges = BadgeRepository::badges_of(&pool, pro.id).await.unwrap();
        assert!(badges.contains(&Badge::TopNote));

        ReviewService::delete(&pool, review_ids[0]).await.unwrap();

        let badges = BadgeRepository::badges_of(&pool, pro.id).await.unwrap();
        assert!(!badges.contains(&Badge::TopNote));
        let rating = ReviewRepository::rating_for(&pool, pro.id).await.unwrap().unwrap();
        assert_eq!(rating.review_count, 4);
    }
}
