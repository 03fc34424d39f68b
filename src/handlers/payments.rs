// src/handlers/payments.rs
// DOCUMENTATION: HTTP handlers for payments
// PURPOSE: Open a payment intent, confirm it, list payments

use crate::auth::AuthUser;
use crate::config::Config;
use crate::errors::DomicareError;
use crate::models::{ConfirmPaymentRequest, CreatePaymentIntentRequest, PaymentQuery};
use crate::services::{PaymentProvider, PaymentService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// POST /api/payments/intent
pub async fn create_intent(
    pool: web::Data<SqlitePool>,
    provider: web::Data<PaymentProvider>,
    config: web::Data<Config>,
    user: AuthUser,
    req: web::Json<CreatePaymentIntentRequest>,
) -> Result<impl Responder, DomicareError> {
    let intent = PaymentService::create_intent(
        pool.get_ref(),
        provider.get_ref(),
        config.get_ref(),
        &user,
        req.reservation_id,
    )
    .await?;
    Ok(HttpResponse::Ok().json(intent))
}

/// POST /api/payments/confirm
pub async fn confirm(
    pool: web::Data<SqlitePool>,
    provider: web::Data<PaymentProvider>,
    user: AuthUser,
    req: web::Json<ConfirmPaymentRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;
    let payment =
        PaymentService::confirm(pool.get_ref(), provider.get_ref(), &user, &req.payment_intent_id)
            .await?;
    Ok(HttpResponse::Ok().json(payment))
}

/// GET /api/payments
pub async fn list(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    query: web::Query<PaymentQuery>,
) -> Result<impl Responder, DomicareError> {
    let payments = PaymentService::list(pool.get_ref(), &user, query.status).await?;
    Ok(HttpResponse::Ok().json(payments))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/payments")
            .route("/intent", web::post().to(create_intent))
            .route("/confirm", web::post().to(confirm))
            .route("", web::get().to(list)),
    );
}
