// src/handlers/reservations.rs
// DOCUMENTATION: HTTP handlers for reservations
// PURPOSE: Quotes, booking, listing and status changes

use crate::auth::AuthUser;
use crate::errors::DomicareError;
use crate::models::{
    CreateReservationRequest, QuoteRequest, ReservationQuery, UpdateReservationStatusRequest,
};
use crate::services::{PaymentProvider, ReservationService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// POST /api/reservations/quote
/// Price breakdown without booking
pub async fn quote(
    pool: web::Data<SqlitePool>,
    _user: AuthUser,
    req: web::Json<QuoteRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;
    let quote = ReservationService::quote(pool.get_ref(), &req).await?;
    Ok(HttpResponse::Ok().json(quote))
}

/// POST /api/reservations
pub async fn create(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    req: web::Json<CreateReservationRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;

    let view = ReservationService::create(pool.get_ref(), &user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(view))
}

/// GET /api/reservations
pub async fn list(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    query: web::Query<ReservationQuery>,
) -> Result<impl Responder, DomicareError> {
    let views = ReservationService::list(pool.get_ref(), &user, query.status).await?;
    Ok(HttpResponse::Ok().json(views))
}

/// GET /api/reservations/{id}
pub async fn get(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    path: web::Path<i64>,
) -> Result<impl Responder, DomicareError> {
    let view = ReservationService::get(pool.get_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// PUT /api/reservations/{id}/status
pub async fn update_status(
    pool: web::Data<SqlitePool>,
    provider: web::Data<PaymentProvider>,
    user: AuthUser,
    path: web::Path<i64>,
    req: web::Json<UpdateReservationStatusRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;
    let view = ReservationService::change_status(
        pool.get_ref(),
        provider.get_ref(),
        &user,
        path.into_inner(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reservations")
            .route("/quote", web::post().to(quote))
            .route("", web::post().to(create))
            .route("", web::get().to(list))
            .route("/{id}", web::get().to(get))
            .route("/{id}/status", web::put().to(update_status)),
    );
}

#[cfg(test)]
mod tests {
    use crate::test_support::{
        accepted_reservation, bearer, build_app, seed_famille, seed_professionnel, TestContext,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn slot(professionnel_id: i64) -> serde_json::Value {
        let start = Utc::now().date_naive() + Duration::days(10);
        json!({
            "professionnel_id": professionnel_id,
            "start_date": start.to_string(),
            "end_date": (start + Duration::days(2)).to_string(),
            "start_time": "08:30",
            "end_time": "12:30",
            "notes": "Toilette et petit-déjeuner"
        })
    }

    #[actix_web::test]
    async fn test_quote_and_book() {
        let ctx = TestContext::new().await;
        let app = test::init_service(build_app(&ctx)).await;
        let famille = seed_famille(&ctx.pool, "famille@example.fr").await;
        let pro = seed_professionnel(&ctx.pool, "pro@example.fr", 22.5).await;
        let token = ctx.token_for(&famille);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/reservations/quote")
                .insert_header(bearer(&token))
                .set_json(slot(pro.id))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let quote: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(quote["days"].as_array().unwrap().len(), 3);
        assert_eq!(quote["hours_per_day"], 4.0);
        assert_eq!(quote["total_price"], 270.0);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/reservations")
                .insert_header(bearer(&token))
                .set_json(slot(pro.id))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let view: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(view["status"], "en_attente");
        assert_eq!(view["total_price"], 270.0);
        assert_eq!(view["contact_unlocked"], false);
        assert!(view["contact"].is_null());

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/reservations?status=en_attente")
                .insert_header(bearer(&ctx.token_for(&pro)))
                .to_request(),
        )
        .await;
        let list: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_past_dates_are_rejected() {
        let ctx = TestContext::new().await;
        let app = test::init_service(build_app(&ctx)).await;
        let famille = seed_famille(&ctx.pool, "famille@example.fr").await;
        let pro = seed_professionnel(&ctx.pool, "pro@example.fr", 20.0).await;

        let mut body = slot(pro.id);
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        body["start_date"] = json!(yesterday.to_string());

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/reservations")
                .insert_header(bearer(&ctx.token_for(&famille)))
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let mut body = slot(pro.id);
        body["start_time"] = json!("8h30");
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/reservations")
                .insert_header(bearer(&ctx.token_for(&famille)))
                .set_json(body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_status_route_cannot_mark_paid() {
        let ctx = TestContext::new().await;
        let app = test::init_service(build_app(&ctx)).await;
        let (famille, _pro, reservation) = accepted_reservation(&ctx.pool).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/reservations/{}/status", reservation.id))
                .insert_header(bearer(&ctx.token_for(&famille)))
                .set_json(json!({"status": "payee"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/reservations/{}/status", reservation.id))
                .insert_header(bearer(&ctx.token_for(&famille)))
                .set_json(json!({"status": "annulee", "reason": "Imprévu familial"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "annulee");
    }
}
