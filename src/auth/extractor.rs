// src/auth/extractor.rs
// DOCUMENTATION: Request extractors for authenticated routes
// PURPOSE: Handlers take `AuthUser` or `AdminUser` as an argument instead of
// checking headers themselves

use crate::auth::JwtManager;
use crate::db::UserRepository;
use crate::errors::DomicareError;
use crate::models::{Role, User};
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use sqlx::SqlitePool;
use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;

/// Any signed-in, active account
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Signed-in account with the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl Deref for AuthUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl Deref for AdminUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

/// Pull the bearer token out of the Authorization header
fn bearer_token(req: &HttpRequest) -> Result<String, DomicareError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| DomicareError::Unauthorized("Missing bearer token".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DomicareError::Unauthorized("Malformed Authorization header".to_string()))
}

/// Validate the token and reload the account so suspensions apply immediately
async fn authenticate(req: HttpRequest) -> Result<User, DomicareError> {
    let token = bearer_token(&req)?;

    let jwt = req
        .app_data::<web::Data<JwtManager>>()
        .cloned()
        .ok_or_else(|| DomicareError::InternalError("JwtManager not registered".to_string()))?;
    let pool = req
        .app_data::<web::Data<SqlitePool>>()
        .cloned()
        .ok_or_else(|| DomicareError::InternalError("Database pool not registered".to_string()))?;

    let claims = jwt.decode(&token)?;
    let user_id = claims.user_id()?;

    let user = UserRepository::find_by_id(pool.get_ref(), user_id)
        .await?
        .ok_or_else(|| {
            log::warn!("Token presented for unknown user {}", user_id);
            DomicareError::Unauthorized("Account no longer exists".to_string())
        })?;

    if !user.is_active {
        log::warn!("Suspended user {} attempted access", user.id);
        return Err(DomicareError::Forbidden("Account suspended".to_string()));
    }

    Ok(user)
}

impl FromRequest for AuthUser {
    type Error = DomicareError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(req).await.map(AuthUser) })
    }
}

impl FromRequest for AdminUser {
    type Error = DomicareError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = authenticate(req).await?;
            if user.role != Role::Admin {
                log::warn!("Non-admin user {} requested an admin route", user.id);
                return Err(DomicareError::Forbidden(
                    "Administrator access required".to_string(),
                ));
            }
            Ok(AdminUser(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert!(bearer_token(&req).is_err());

        let req = TestRequest::default().to_http_request();
        assert!(matches!(
            bearer_token(&req),
            Err(DomicareError::Unauthorized(_))
        ));
    }
}
