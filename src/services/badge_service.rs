// src/services/badge_service.rs
// DOCUMENTATION: Automatic badge rules
// PURPOSE: Re-evaluated whenever the underlying data changes (document
// review, new review, completed reservation)

use crate::db::{BadgeRepository, DocumentRepository, ReservationRepository, UserRepository};
use crate::errors::DomicareError;
use crate::models::{Badge, DocumentType, UserRating};
use sqlx::SqlitePool;

pub const TOP_NOTE_MIN_AVERAGE: f64 = 4.5;
pub const TOP_NOTE_MIN_REVIEWS: i64 = 5;
pub const EXPERIENCED_MIN_COMPLETED: i64 = 10;

/// Every required document type has been validated
pub fn has_all_required(validated: &[DocumentType]) -> bool {
    DocumentType::REQUIRED_FOR_VERIFICATION
        .iter()
        .all(|required| validated.contains(required))
}

pub fn qualifies_top_note(rating: &UserRating) -> bool {
    rating.review_count >= TOP_NOTE_MIN_REVIEWS && rating.average_rating >= TOP_NOTE_MIN_AVERAGE
}

pub struct BadgeService;

impl BadgeService {
    /// Sync `is_verified` and the `verifie` badge with validated documents
    pub async fn evaluate_verification(
        pool: &SqlitePool,
        user_id: i64,
    ) -> Result<bool, DomicareError> {
        let validated = DocumentRepository::validated_types(pool, user_id).await?;
        let verified = has_all_required(&validated);

        UserRepository::set_verified(pool, user_id, verified).await?;
        Self::apply(pool, user_id, Badge::Verifie, verified).await?;

        Ok(verified)
    }

    /// A rejected required document withdraws verification until a new one is validated
    pub async fn clear_verification(pool: &SqlitePool, user_id: i64) -> Result<(), DomicareError> {
        UserRepository::set_verified(pool, user_id, false).await?;
        Self::apply(pool, user_id, Badge::Verifie, false).await
    }

    pub async fn evaluate_top_note(
        pool: &SqlitePool,
        rating: &UserRating,
    ) -> Result<(), DomicareError> {
        Self::apply(pool, rating.user_id, Badge::TopNote, qualifies_top_note(rating)).await
    }

    pub async fn evaluate_experience(
        pool: &SqlitePool,
        professionnel_id: i64,
    ) -> Result<(), DomicareError> {
        let completed = ReservationRepository::count_completed_for(pool, professionnel_id).await?;
        Self::apply(
            pool,
            professionnel_id,
            Badge::Experimente,
            completed >= EXPERIENCED_MIN_COMPLETED,
        )
        .await
    }

    async fn apply(
        pool: &SqlitePool,
        user_id: i64,
        badge: Badge,
        earned: bool,
    ) -> Result<(), DomicareError> {
        if earned {
            if BadgeRepository::award(pool, user_id, badge).await? {
                log::info!("User {} earned badge {:?}", user_id, badge);
            }
        } else if BadgeRepository::revoke(pool, user_id, badge).await? {
            log::info!("User {} lost badge {:?}", user_id, badge);
        }
        Ok(())
    }
}
