// src/handlers/admin.rs
// DOCUMENTATION: Admin back-office handlers
// PURPOSE: Moderation and statistics endpoints, all behind the AdminUser extractor

use crate::auth::AdminUser;
use crate::errors::DomicareError;
use crate::models::{
    AdminUserQuery, AwardBadgeRequest, Badge, DocumentQuery, PaymentQuery, ReservationQuery,
    ReviewDocumentRequest, UpdateUserStatusRequest,
};
use crate::services::{
    AdminService, DocumentService, PaymentService, ReservationService, ReviewService,
};
use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// GET /api/admin/stats
/// Dashboard counters: users, reservations, revenue, pending documents, reviews
pub async fn stats(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
) -> Result<impl Responder, DomicareError> {
    let stats = AdminService::stats(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/admin/users
pub async fn list_users(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
    query: web::Query<AdminUserQuery>,
) -> Result<impl Responder, DomicareError> {
    let users = AdminService::list_users(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// PUT /api/admin/users/{id}/status
pub async fn update_user_status(
    pool: web::Data<SqlitePool>,
    admin: AdminUser,
    path: web::Path<i64>,
    body: web::Json<UpdateUserStatusRequest>,
) -> Result<impl Responder, DomicareError> {
    let user =
        AdminService::set_user_active(pool.get_ref(), &admin, path.into_inner(), body.is_active)
            .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// DELETE /api/admin/users/{id}
/// Soft delete
pub async fn delete_user(
    pool: web::Data<SqlitePool>,
    admin: AdminUser,
    path: web::Path<i64>,
) -> Result<impl Responder, DomicareError> {
    AdminService::delete_user(pool.get_ref(), &admin, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/admin/documents
pub async fn list_documents(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
    query: web::Query<DocumentQuery>,
) -> Result<impl Responder, DomicareError> {
    let docs = DocumentService::list_for_admin(pool.get_ref(), query.status).await?;
    Ok(HttpResponse::Ok().json(docs))
}

/// PUT /api/admin/documents/{id}/review
pub async fn review_document(
    pool: web::Data<SqlitePool>,
    admin: AdminUser,
    path: web::Path<i64>,
    body: web::Json<ReviewDocumentRequest>,
) -> Result<impl Responder, DomicareError> {
    body.validate()?;
    let doc =
        DocumentService::review(pool.get_ref(), &admin, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(doc))
}

/// GET /api/admin/reservations
pub async fn list_reservations(
    pool: web::Data<SqlitePool>,
    admin: AdminUser,
    query: web::Query<ReservationQuery>,
) -> Result<impl Responder, DomicareError> {
    let views = ReservationService::list(pool.get_ref(), &admin, query.status).await?;
    Ok(HttpResponse::Ok().json(views))
}

/// GET /api/admin/payments
pub async fn list_payments(
    pool: web::Data<SqlitePool>,
    admin: AdminUser,
    query: web::Query<PaymentQuery>,
) -> Result<impl Responder, DomicareError> {
    let payments = PaymentService::list(pool.get_ref(), &admin, query.status).await?;
    Ok(HttpResponse::Ok().json(payments))
}

/// GET /api/admin/reviews
pub async fn list_reviews(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
) -> Result<impl Responder, DomicareError> {
    let reviews = ReviewService::list_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// DELETE /api/admin/reviews/{id}
pub async fn delete_review(
    pool: web::Data<SqlitePool>,
    admin: AdminUser,
    path: web::Path<i64>,
) -> Result<impl Responder, DomicareError> {
    let id = path.into_inner();
    ReviewService::delete(pool.get_ref(), id).await?;
    log::info!("Admin {} removed review {}", admin.id, id);
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/admin/badges
pub async fn award_badge(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
    body: web::Json<AwardBadgeRequest>,
) -> Result<impl Responder, DomicareError> {
    let badges = AdminService::award_badge(pool.get_ref(), body.user_id, body.badge).await?;
    Ok(HttpResponse::Ok().json(badges))
}

/// DELETE /api/admin/badges/{user_id}/{badge}
pub async fn revoke_badge(
    pool: web::Data<SqlitePool>,
    _admin: AdminUser,
    path: web::Path<(i64, Badge)>,
) -> Result<impl Responder, DomicareError> {
    let (user_id, badge) = path.into_inner();
    AdminService::revoke_badge(pool.get_ref(), user_id, badge).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin")
            .route("/stats", web::get().to(stats))
            .route("/users", web::get().to(list_users))
            .route("/users/{id}/status", web::put().to(update_user_status))
            .route("/users/{id}", web::delete().to(delete_user))
            .route("/documents", web::get().to(list_documents))
            .route("/documents/{id}/review", web::put().to(review_document))
            .route("/reservations", web::get().to(list_reservations))
            .route("/payments", web::get().to(list_payments))
            .route("/reviews", web::get().to(list_reviews))
            .route("/reviews/{id}", web::delete().to(delete_review))
            .route("/badges", web::post().to(award_badge))
            .route("/badges/{user_id}/{badge}", web::delete().to(revoke_badge)),
    );
}
