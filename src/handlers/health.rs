// src/handlers/health.rs
// DOCUMENTATION: Service root and health check handlers
// PURPOSE: Simple endpoints to verify service status

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;

const SERVICE_NAME: &str = "domicare-api";

/// GET /
/// Service identity and the available route groups
pub async fn root() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "routes": [
            "/health",
            "/api/auth",
            "/api/users",
            "/api/documents",
            "/api/reservations",
            "/api/payments",
            "/api/messages",
            "/api/reviews",
            "/api/admin"
        ]
    }))
}

/// GET /health
pub async fn health_check(pool: web::Data<SqlitePool>) -> impl Responder {
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool.get_ref())
        .await
    {
        Ok(_) => "ok",
        Err(e) => {
            log::error!("Health check database probe failed: {}", e);
            "unavailable"
        }
    };

    let body = json!({
        "status": if database == "ok" { "ok" } else { "degraded" },
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "database": database
    });

    if database == "ok" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health_check));
}

#[cfg(test)]
mod tests {
    use crate::test_support::{build_app, TestContext};
    use actix_web::test;

    #[actix_web::test]
    async fn test_root_and_health() {
        let ctx = TestContext::new().await;
        let app = test::init_service(build_app(&ctx)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["service"], "domicare-api");

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["database"], "ok");
    }
}
