// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Review left by a famille after a completed reservation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub reservation_id: i64,
    pub author_id: i64,
    pub target_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub reservation_id: i64,

    #[validate(range(min = 1, max = 5))]
    pub rating: i64,

    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}

/// Review response DTO exposed via API
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewResponse {
    pub id: i64,
    pub reservation_id: i64,
    pub target_id: i64,
    pub author_first_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Aggregated rating of a user
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRating {
    pub user_id: i64,
    pub average_rating: f64,
    pub review_count: i64,
    pub updated_at: DateTime<Utc>,
}

/// Profile badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Badge {
    /// All required documents validated
    Verifie,
    /// Average rating of at least 4.5 over 5 or more reviews
    TopNote,
    /// At least 10 completed reservations
    Experimente,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserBadge {
    pub id: i64,
    pub user_id: i64,
    pub badge: Badge,
    pub awarded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwardBadgeRequest {
    pub user_id: i64,
    pub badge: Badge,
}
