// src/test_support.rs
// DOCUMENTATION: Shared fixtures for service and handler tests
// PURPOSE: In-memory database, seeded accounts and a fully wired App

use crate::auth::{hash_password, JwtManager};
use crate::config::{init_memory_pool, Config};
use crate::db::{NewReservation, NewUser, ReservationRepository, UserRepository};
use crate::models::{Reservation, ReservationStatus, Role, User};
use crate::services::{LoginRateLimiter, PaymentProvider};
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderName, AUTHORIZATION};
use actix_web::{web, App};
use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use std::sync::{Arc, OnceLock};

pub const TEST_PASSWORD: &str = "motdepasse123";

/// Argon2 is slow in debug builds; hash the shared password once
fn test_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(TEST_PASSWORD).unwrap())
}

pub async fn test_pool() -> SqlitePool {
    init_memory_pool().await.unwrap()
}

async fn seed_user(
    pool: &SqlitePool,
    email: &str,
    role: Role,
    first_name: &str,
    hourly_rate: Option<f64>,
) -> User {
    UserRepository::insert(
        pool,
        NewUser {
            email,
            password_hash: test_password_hash(),
            role,
            first_name,
            last_name: "Dupont",
            phone: Some("0601020304"),
            address: Some("12 rue des Lilas"),
            city: Some("Lyon"),
            postal_code: Some("69003"),
            bio: None,
            hourly_rate,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_famille(pool: &SqlitePool, email: &str) -> User {
    seed_user(pool, email, Role::Famille, "Famille", None).await
}

pub async fn seed_professionnel(pool: &SqlitePool, email: &str, hourly_rate: f64) -> User {
    seed_user(pool, email, Role::Professionnel, "Pro", Some(hourly_rate)).await
}

pub async fn seed_admin(pool: &SqlitePool, email: &str) -> User {
    seed_user(pool, email, Role::Admin, "Admin", None).await
}

/// Two-day reservation starting `offset_days` from today, three hours a day
async fn reservation_at(
    pool: &SqlitePool,
    famille: &User,
    pro: &User,
    offset_days: i64,
) -> Reservation {
    let start = Utc::now().date_naive() + Duration::days(offset_days);
    let rate = pro.hourly_rate.unwrap_or(20.0);
    ReservationRepository::create(
        pool,
        &NewReservation {
            famille_id: famille.id,
            professionnel_id: pro.id,
            start_date: start,
            end_date: start + Duration::days(1),
            start_time: "09:00".to_string(),
            end_time: "12:00".to_string(),
            hours_per_day: 3.0,
            hourly_rate: rate,
            total_price: 6.0 * rate,
            notes: None,
        },
    )
    .await
    .unwrap()
}

async fn advance(pool: &SqlitePool, id: i64, steps: &[ReservationStatus]) -> Reservation {
    let mut current = ReservationRepository::get_by_id(pool, id).await.unwrap();
    for next in steps {
        current = ReservationRepository::update_status(pool, id, current.status, *next, None)
            .await
            .unwrap();
    }
    current
}

pub async fn pending_reservation(pool: &SqlitePool, famille: &User, pro: &User) -> Reservation {
    reservation_at(pool, famille, pro, 3).await
}

/// Famille, professionnel and an accepted reservation between them
pub async fn accepted_reservation(pool: &SqlitePool) -> (User, User, Reservation) {
    let famille = seed_famille(pool, "famille@example.fr").await;
    let pro = seed_professionnel(pool, "pro@example.fr", 20.0).await;
    let pending = pending_reservation(pool, &famille, &pro).await;
    let accepted = advance(pool, pending.id, &[ReservationStatus::Acceptee]).await;
    (famille, pro, accepted)
}

/// Reservation that took place last week, paid but not yet closed
pub async fn paid_past_reservation(pool: &SqlitePool, famille: &User, pro: &User) -> Reservation {
    let past = reservation_at(pool, famille, pro, -7).await;
    advance(
        pool,
        past.id,
        &[ReservationStatus::Acceptee, ReservationStatus::Payee],
    )
    .await
}

/// Reservation that took place last week and is completed
pub async fn completed_reservation(pool: &SqlitePool, famille: &User, pro: &User) -> Reservation {
    let paid = paid_past_reservation(pool, famille, pro).await;
    advance(pool, paid.id, &[ReservationStatus::Terminee]).await
}

pub fn bearer(token: &str) -> (HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", token))
}

/// Application state shared by handler tests
pub struct TestContext {
    pub pool: SqlitePool,
    pub config: web::Data<Config>,
    pub jwt: web::Data<JwtManager>,
    pub provider: web::Data<PaymentProvider>,
    pub limiter: web::Data<Arc<LoginRateLimiter>>,
}

impl TestContext {
    pub async fn new() -> Self {
        let config = Config::for_tests();
        Self {
            pool: test_pool().await,
            jwt: web::Data::new(JwtManager::from_config(&config)),
            provider: web::Data::new(PaymentProvider::from_config(&config)),
            limiter: web::Data::new(Arc::new(LoginRateLimiter::new(
                config.login_attempts_per_minute,
            ))),
            config: web::Data::new(config),
        }
    }

    pub fn token_for(&self, user: &User) -> String {
        self.jwt.issue(user).unwrap()
    }
}

/// Same wiring as main.rs, minus the server middleware
pub fn build_app(
    ctx: &TestContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_limit = ctx.config.json_body_limit();
    App::new()
        .app_data(web::Data::new(ctx.pool.clone()))
        .app_data(ctx.config.clone())
        .app_data(ctx.jwt.clone())
        .app_data(ctx.provider.clone())
        .app_data(ctx.limiter.clone())
        .configure(|cfg| crate::configure_app(cfg, json_limit))
}
