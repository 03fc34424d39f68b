// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, and start HTTP server

use actix_web::{middleware::Logger, web, App, HttpServer};
use domicare_api::auth::JwtManager;
use domicare_api::config::{self, Config};
use domicare_api::services::{start_cleanup_task, LoginRateLimiter, PaymentProvider};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.clone()
        } else {
            "info,actix_web=info,sqlx=warn".to_string()
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting domicare-api...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Auth, payments and login throttling
    let jwt = web::Data::new(JwtManager::from_config(&config));
    let provider = web::Data::new(PaymentProvider::from_config(&config));
    log::info!("Payment provider: {}", provider.name());

    let limiter = Arc::new(LoginRateLimiter::new(config.login_attempts_per_minute));
    // Forget idle login keys every 5 minutes
    start_cleanup_task(limiter.clone(), 300);

    if let Err(e) = tokio::fs::create_dir_all(&config.upload_dir).await {
        log::error!("Cannot create upload directory {}: {}", config.upload_dir, e);
        std::process::exit(1);
    }

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let json_limit = config.json_body_limit();
    let config = web::Data::new(config);
    let limiter = web::Data::new(limiter);

    HttpServer::new(move || {
        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(config.clone())
            .app_data(jwt.clone())
            .app_data(provider.clone())
            .app_data(limiter.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(|cfg| domicare_api::configure_app(cfg, json_limit))
    })
    .bind(&server_addr)?
    .run()
    .await
}
