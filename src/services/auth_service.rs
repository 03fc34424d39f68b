// src/services/auth_service.rs
// DOCUMENTATION: Registration, login and password changes

use crate::auth::{hash_password, verify_password, JwtManager};
use crate::db::UserRepository;
use crate::errors::DomicareError;
use crate::models::{
    normalize_email, AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, Role,
    User,
};
use crate::services::LoginRateLimiter;
use sqlx::SqlitePool;

/// Same message for unknown e-mail and wrong password
const BAD_CREDENTIALS: &str = "Invalid e-mail or password";

pub struct AuthService;

impl AuthService {
    /// Create a famille or professionnel account and sign it in
    pub async fn register(
        pool: &SqlitePool,
        jwt: &JwtManager,
        req: RegisterRequest,
    ) -> Result<AuthResponse, DomicareError> {
        if req.role == Role::Admin {
            return Err(DomicareError::Forbidden(
                "Administrator accounts cannot be self-registered".to_string(),
            ));
        }

        if req.role == Role::Famille && req.hourly_rate.is_some() {
            return Err(DomicareError::InvalidInput(
                "Only professionnels have an hourly rate".to_string(),
            ));
        }

        let email = normalize_email(&req.email);
        let password_hash = hash_password(&req.password)?;
        let user = UserRepository::create(pool, &req, &email, &password_hash).await?;

        Self::issue(jwt, user)
    }

    pub async fn login(
        pool: &SqlitePool,
        jwt: &JwtManager,
        limiter: &LoginRateLimiter,
        req: LoginRequest,
    ) -> Result<AuthResponse, DomicareError> {
        let email = normalize_email(&req.email);

        if !limiter.check(&email) {
            return Err(DomicareError::RateLimitExceeded);
        }

        let user = UserRepository::find_by_email(pool, &email)
            .await?
            .ok_or_else(|| {
                log::info!("Login attempt for unknown e-mail");
                DomicareError::Unauthorized(BAD_CREDENTIALS.to_string())
            })?;

        if !verify_password(&req.password, &user.password_hash)? {
            log::info!("Failed login for user {}", user.id);
            return Err(DomicareError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            return Err(DomicareError::Forbidden("Account suspended".to_string()));
        }

        log::info!("User {} logged in", user.id);
        Self::issue(jwt, user)
    }

    pub async fn change_password(
        pool: &SqlitePool,
        user: &User,
        req: ChangePasswordRequest,
    ) -> Result<(), DomicareError> {
        if !verify_password(&req.current_password, &user.password_hash)? {
            return Err(DomicareError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let hash = hash_password(&req.new_password)?;
        UserRepository::update_password(pool, user.id, &hash).await?;
        log::info!("User {} changed password", user.id);
        Ok(())
    }

    fn issue(jwt: &JwtManager, user: User) -> Result<AuthResponse, DomicareError> {
        Ok(AuthResponse {
            token: jwt.issue(&user)?,
            user: user.to_response(),
        })
    }
}
