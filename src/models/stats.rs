// src/models/stats.rs
// DOCUMENTATION: Admin dashboard statistics

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total: i64,
    pub by_role: Vec<LabelCount>,
    pub active: i64,
    pub suspended: i64,
    pub verified_professionnels: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStats {
    pub total: i64,
    pub by_status: Vec<LabelCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub users: UserStats,
    pub reservations: ReservationStats,
    /// Sum of successful payments
    pub revenue: f64,
    pub pending_documents: i64,
    pub review_count: i64,
    pub average_rating: Option<f64>,
}
