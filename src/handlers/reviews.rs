// src/handlers/reviews.rs
// DOCUMENTATION: HTTP handlers for reviews

use crate::auth::AuthUser;
use crate::errors::DomicareError;
use crate::models::CreateReviewRequest;
use crate::services::ReviewService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// POST /api/reviews
pub async fn create(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;
    let review = ReviewService::create(pool.get_ref(), &user, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(review))
}

/// GET /api/reviews/user/{id}
/// Public
pub async fn list_for_user(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<impl Responder, DomicareError> {
    let reviews = ReviewService::list_for_user(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reviews")
            .route("", web::post().to(create))
            .route("/user/{id}", web::get().to(list_for_user)),
    );
}

#[cfg(test)]
mod tests {
    use crate::test_support::{
        bearer, build_app, completed_reservation, seed_famille, seed_professionnel, TestContext,
    };
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    #[actix_web::test]
    async fn test_review_completed_reservation() {
        let ctx = TestContext::new().await;
        let app = test::init_service(build_app(&ctx)).await;
        let famille = seed_famille(&ctx.pool, "famille@example.fr").await;
        let pro = seed_professionnel(&ctx.pool, "pro@example.fr", 20.0).await;
        let reservation = completed_reservation(&ctx.pool, &famille, &pro).await;
        let token = ctx.token_for(&famille);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/reviews")
                .insert_header(bearer(&token))
                .set_json(json!({"reservation_id": reservation.id, "rating": 6}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/reviews")
                .insert_header(bearer(&token))
                .set_json(json!({
                    "reservation_id": reservation.id,
                    "rating": 5,
                    "comment": "Ponctuelle et douce"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/reviews")
                .insert_header(bearer(&token))
                .set_json(json!({"reservation_id": reservation.id, "rating": 4}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/reviews/user/{}", pro.id))
                .to_request(),
        )
        .await;
        let reviews: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(reviews.as_array().unwrap().len(), 1);
        assert_eq!(reviews[0]["author_first_name"], "Famille");

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/users/{}", pro.id))
                .insert_header(bearer(&token))
                .to_request(),
        )
        .await;
        let profile: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(profile["average_rating"], 5.0);
        assert_eq!(profile["review_count"], 1);
    }
}
