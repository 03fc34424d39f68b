// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for account access
// PURPOSE: Registration, login, current user and password change

use crate::auth::{AuthUser, JwtManager};
use crate::errors::DomicareError;
use crate::models::{ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::services::{AuthService, LoginRateLimiter};
use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use std::sync::Arc;
use validator::Validate;

/// POST /api/auth/register
pub async fn register(
    pool: web::Data<SqlitePool>,
    jwt: web::Data<JwtManager>,
    req: web::Json<RegisterRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;

    let auth = AuthService::register(pool.get_ref(), jwt.get_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(auth))
}

/// POST /api/auth/login
pub async fn login(
    pool: web::Data<SqlitePool>,
    jwt: web::Data<JwtManager>,
    limiter: web::Data<Arc<LoginRateLimiter>>,
    req: web::Json<LoginRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;

    let auth = AuthService::login(
        pool.get_ref(),
        jwt.get_ref(),
        limiter.get_ref(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(auth))
}

/// GET /api/auth/me
pub async fn me(user: AuthUser) -> Result<impl Responder, DomicareError> {
    Ok(HttpResponse::Ok().json(user.to_response()))
}

/// PUT /api/auth/password
pub async fn change_password(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    req: web::Json<ChangePasswordRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;
    AuthService::change_password(pool.get_ref(), &user, req.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me))
            .route("/password", web::put().to(change_password)),
    );
}
