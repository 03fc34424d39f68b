// src/handlers/messages.rs
// DOCUMENTATION: HTTP handlers for messaging

use crate::auth::AuthUser;
use crate::errors::DomicareError;
use crate::models::SendMessageRequest;
use crate::services::MessageService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// POST /api/messages
pub async fn send(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    req: web::Json<SendMessageRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;

    let message = MessageService::send(pool.get_ref(), &user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(message))
}

/// GET /api/messages/conversations
pub async fn conversations(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
) -> Result<impl Responder, DomicareError> {
    let inbox = MessageService::conversations(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(inbox))
}

/// GET /api/messages/with/{user_id}
pub async fn thread(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> Result<impl Responder, DomicareError> {
    let messages = MessageService::thread(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(messages))
}

/// GET /api/messages/unread-count
pub async fn unread_count(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
) -> Result<impl Responder, DomicareError> {
    let count = MessageService::unread_count(pool.get_ref(), &user).await?;
    Ok(HttpResponse::Ok().json(count))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/messages")
            .route("", web::post().to(send))
            .route("/conversations", web::get().to(conversations))
            .route("/with/{user_id}", web::get().to(thread))
            .route("/unread-count", web::get().to(unread_count)),
    );
}
