// src/services/admin_service.rs
// DOCUMENTATION: Admin back-office operations
// PURPOSE: Dashboard statistics, account moderation and manual badges

use crate::db::{
    BadgeRepository, DocumentRepository, PaymentRepository, ReviewRepository, StatsRepository,
    UserRepository,
};
use crate::errors::DomicareError;
use crate::models::{
    AdminUserQuery, Badge, DashboardStats, PageParams, Paginated, User, UserBadge, UserResponse,
};
use sqlx::SqlitePool;

pub struct AdminService;

impl AdminService {
    pub async fn stats(pool: &SqlitePool) -> Result<DashboardStats, DomicareError> {
        let users = StatsRepository::user_stats(pool).await?;
        let reservations = StatsRepository::reservation_stats(pool).await?;
        let revenue = PaymentRepository::total_revenue(pool).await?;
        let pending_documents = DocumentRepository::count_pending(pool).await?;
        let (review_count, average_rating) = ReviewRepository::global_stats(pool).await?;

        Ok(DashboardStats {
            users,
            reservations,
            revenue,
            pending_documents,
            review_count,
            average_rating: average_rating.map(|avg| (avg * 100.0).round() / 100.0),
        })
    }

    pub async fn list_users(
        pool: &SqlitePool,
        query: AdminUserQuery,
    ) -> Result<Paginated<UserResponse>, DomicareError> {
        let page = PageParams::new(query.page, query.limit);
        let (users, total) = UserRepository::list_for_admin(pool, &query, page).await?;
        let data = users.iter().map(User::to_response).collect();
        Ok(Paginated::new(data, total, page))
    }

    /// Suspend or reactivate an account
    pub async fn set_user_active(
        pool: &SqlitePool,
        admin: &User,
        user_id: i64,
        is_active: bool,
    ) -> Result<UserResponse, DomicareError> {
        if user_id == admin.id && !is_active {
            return Err(DomicareError::InvalidInput(
                "You cannot suspend your own account".to_string(),
            ));
        }

        let user = UserRepository::set_active(pool, user_id, is_active).await?;
        log::info!(
            "Admin {} {} user {}",
            admin.id,
            if is_active { "reactivated" } else { "suspended" },
            user_id
        );
        Ok(user.to_response())
    }

    pub async fn delete_user(
        pool: &SqlitePool,
        admin: &User,
        user_id: i64,
    ) -> Result<(), DomicareError> {
        if user_id == admin.id {
            return Err(DomicareError::InvalidInput(
                "You cannot delete your own account".to_string(),
            ));
        }

        UserRepository::soft_delete(pool, user_id).await?;
        log::info!("Admin {} deleted user {}", admin.id, user_id);
        Ok(())
    }

    /// Award a badge by hand; awarding twice is a no-op
    pub async fn award_badge(
        pool: &SqlitePool,
        user_id: i64,
        badge: Badge,
    ) -> Result<Vec<UserBadge>, DomicareError> {
        UserRepository::get_by_id(pool, user_id).await?;
        if BadgeRepository::award(pool, user_id, badge).await? {
            log::info!("Badge {:?} awarded to user {}", badge, user_id);
        }
        BadgeRepository::list_for_user(pool, user_id).await
    }

    pub async fn revoke_badge(
        pool: &SqlitePool,
        user_id: i64,
        badge: Badge,
    ) -> Result<(), DomicareError> {
        if !BadgeRepository::revoke(pool, user_id, badge).await? {
            return Err(DomicareError::NotFound(format!(
                "Badge {:?} of user {}",
                badge, user_id
            )));
        }
        log::info!("Badge {:?} revoked from user {}", badge, user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{completed_reservation, seed_admin, seed_famille, seed_professionnel, test_pool};

    #[tokio::test]
    async fn test_admin_cannot_lock_themselves_out() {
        let pool = test_pool().await;
        let admin = seed_admin(&pool, "admin@example.fr").await;

        let suspend = AdminService::set_user_active(&pool, &admin, admin.id, false).await;
        assert!(matches!(suspend, Err(DomicareError::InvalidInput(_))));

        let delete = AdminService::delete_user(&pool, &admin, admin.id).await;
        assert!(matches!(delete, Err(DomicareError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_suspend_and_soft_delete() {
        let pool = test_pool().await;
        let admin = seed_admin(&pool, "admin@example.fr").await;
        let famille = seed_famille(&pool, "famille@example.fr").await;

        let suspended = AdminService::set_user_active(&pool, &admin, famille.id, false)
            .await
            .unwrap();
        assert!(!suspended.is_active);

        AdminService::delete_user(&pool, &admin, famille.id).await.unwrap();
        let deleted = UserRepository::get_by_id(&pool, famille.id).await.unwrap();
        assert!(!deleted.is_active);
        assert!(deleted.email.ends_with("@deleted.invalid"));
        assert!(UserRepository::find_by_email(&pool, "famille@example.fr")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_badges_are_idempotent() {
        let pool = test_pool().await;
        let pro = seed_professionnel(&pool, "pro@example.fr", 22.0).await;

        AdminService::award_badge(&pool, pro.id, Badge::Experimente).await.unwrap();
        let badges = AdminService::award_badge(&pool, pro.id, Badge::Experimente)
            .await
            .unwrap();
        assert_eq!(badges.len(), 1);

        AdminService::revoke_badge(&pool, pro.id, Badge::Experimente).await.unwrap();
        let again = AdminService::revoke_badge(&pool, pro.id, Badge::Experimente).await;
        assert!(matches!(again, Err(DomicareError::NotFound(_))));

        let missing = AdminService::award_badge(&pool, 9999, Badge::Verifie).await;
        assert!(matches!(missing, Err(DomicareError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let pool = test_pool().await;
        seed_admin(&pool, "admin@example.fr").await;
        let pro = seed_professionnel(&pool, "pro@example.fr", 20.0).await;
        let famille = seed_famille(&pool, "famille@example.fr").await;
        completed_reservation(&pool, &famille, &pro).await;

        let stats = AdminService::stats(&pool).await.unwrap();
        assert_eq!(stats.users.total, 3);
        assert_eq!(stats.users.active, 3);
        assert_eq!(stats.reservations.total, 1);
        assert_eq!(stats.review_count, 0);
        assert!(stats.average_rating.is_none());
        assert_eq!(stats.pending_documents, 0);
    }
}
