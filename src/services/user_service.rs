// src/services/user_service.rs
// DOCUMENTATION: Profiles and the professionnel directory

use crate::db::{BadgeRepository, ReviewRepository, UserRepository};
use crate::errors::DomicareError;
use crate::models::{
    PageParams, Paginated, ProfessionnelQuery, PublicProfile, Role, UpdateProfileRequest, User,
    UserResponse,
};
use sqlx::SqlitePool;

pub struct UserService;

impl UserService {
    /// Public view of any user, with rating and badges
    pub async fn public_profile(
        pool: &SqlitePool,
        user: &User,
    ) -> Result<PublicProfile, DomicareError> {
        let rating = ReviewRepository::rating_for(pool, user.id).await?;
        let badges = BadgeRepository::badges_of(pool, user.id).await?;
        Ok(user.to_public(rating.as_ref(), badges))
    }

    pub async fn get_public_profile(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<PublicProfile, DomicareError> {
        let user = UserRepository::get_by_id(pool, id).await?;
        if !user.is_active {
            return Err(DomicareError::NotFound(format!("User {}", id)));
        }
        Self::public_profile(pool, &user).await
    }

    pub async fn search_professionnels(
        pool: &SqlitePool,
        query: ProfessionnelQuery,
    ) -> Result<Paginated<PublicProfile>, DomicareError> {
        let page = PageParams::new(query.page, query.limit);
        let (users, total) = UserRepository::search_professionnels(pool, &query, page).await?;

        let mut profiles = Vec::with_capacity(users.len());
        for user in &users {
            profiles.push(Self::public_profile(pool, user).await?);
        }

        Ok(Paginated::new(profiles, total, page))
    }

    pub async fn update_profile(
        pool: &SqlitePool,
        user: &User,
        req: UpdateProfileRequest,
    ) -> Result<UserResponse, DomicareError> {
        if req.hourly_rate.is_some() && user.role != Role::Professionnel {
            return Err(DomicareError::InvalidInput(
                "Only professionnels have an hourly rate".to_string(),
            ));
        }

        let updated = UserRepository::update_profile(pool, user.id, &req).await?;
        log::info!("User {} updated profile", user.id);
        Ok(updated.to_response())
    }
}
