// src/handlers/users.rs
// DOCUMENTATION: HTTP handlers for profiles
// PURPOSE: Public professionnel directory, profile lookup and self-update

use crate::auth::AuthUser;
use crate::errors::DomicareError;
use crate::models::{ProfessionnelQuery, UpdateProfileRequest};
use crate::services::UserService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::SqlitePool;
use validator::Validate;

/// GET /api/users/professionnels
/// Public directory, no token needed
pub async fn list_professionnels(
    pool: web::Data<SqlitePool>,
    query: web::Query<ProfessionnelQuery>,
) -> Result<impl Responder, DomicareError> {
    let result = UserService::search_professionnels(pool.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/users/{id}
pub async fn get_profile(
    pool: web::Data<SqlitePool>,
    _user: AuthUser,
    path: web::Path<i64>,
) -> Result<impl Responder, DomicareError> {
    let profile = UserService::get_public_profile(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/users/me
pub async fn update_me(
    pool: web::Data<SqlitePool>,
    user: AuthUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<impl Responder, DomicareError> {
    req.validate()?;

    let updated = UserService::update_profile(pool.get_ref(), &user, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .route("/professionnels", web::get().to(list_professionnels))
            .route("/me", web::put().to(update_me))
            .route("/{id}", web::get().to(get_profile)),
    );
}

#[cfg(test)]
mod tests {
    use crate::db::UserRepository;
    use crate::test_support::{bearer, build_app, seed_famille, seed_professionnel, TestContext};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    #[actix_web::test]
    async fn test_directory_hides_contact_details() {
        let ctx = TestContext::new().await;
        let app = test::init_service(build_app(&ctx)).await;
        seed_professionnel(&ctx.pool, "pro1@example.fr", 20.0).await;
        let pro2 = seed_professionnel(&ctx.pool, "pro2@example.fr", 25.0).await;
        seed_famille(&ctx.pool, "famille@example.fr").await;
        UserRepository::set_verified(&ctx.pool, pro2.id, true).await.unwrap();

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/users/professionnels?city=lyon&limit=1")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total_count"], 2);
        assert_eq!(body["has_more"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert!(body["data"][0].get("email").is_none());
        assert!(body["data"][0].get("phone").is_none());
        assert_eq!(body["data"][0]["last_name_initial"], "D.");

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/users/professionnels?verified_only=true")
                .to_request(),
        )
        .await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["data"][0]["id"], pro2.id);
    }

    #[actix_web::test]
    async fn test_directory_filters_are_literal_and_pages_bounded() {
        let ctx = TestContext::new().await;
        let app = test::init_service(build_app(&ctx)).await;
        seed_professionnel(&ctx.pool, "pro1@example.fr", 20.0).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/users/professionnels?city=%25")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total_count"], 0);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/users/professionnels?page=9223372036854775807&limit=100")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total_count"], 1);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
        assert_eq!(body["has_more"], false);
    }

    #[actix_web::test]
    async fn test_profile_update_rules() {
        let ctx = TestContext::new().await;
        let app = test::init_service(build_app(&ctx)).await;
        let famille = seed_famille(&ctx.pool, "famille@example.fr").await;
        let pro = seed_professionnel(&ctx.pool, "pro@example.fr", 20.0).await;

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/users/me")
                .insert_header(bearer(&ctx.token_for(&famille)))
                .set_json(json!({"hourly_rate": 30.0}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/users/me")
                .insert_header(bearer(&ctx.token_for(&pro)))
                .set_json(json!({"hourly_rate": 28.5, "bio": "Auxiliaire de vie"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["hourly_rate"], 28.5);
        assert_eq!(body["bio"], "Auxiliaire de vie");

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/users/{}", pro.id))
                .insert_header(bearer(&ctx.token_for(&famille)))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/users/{}", pro.id))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
