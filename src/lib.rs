// src/lib.rs
// DOCUMENTATION: Library root shared by the server and the admin bootstrap binary
// PURPOSE: Module tree and route wiring

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

use actix_web::web;

/// Register extractor settings and every route group
/// DOCUMENTATION: Used by main.rs and by the handler tests so both see the same app
pub fn configure_app(cfg: &mut web::ServiceConfig, json_limit: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(json_limit)
            .error_handler(errors::json_error_handler),
    )
    .app_data(web::QueryConfig::default().error_handler(errors::query_error_handler))
    .app_data(web::PathConfig::default().error_handler(errors::path_error_handler))
    .configure(handlers::health_config)
    .configure(handlers::auth_config)
    .configure(handlers::users_config)
    .configure(handlers::documents_config)
    .configure(handlers::reservations_config)
    .configure(handlers::payments_config)
    .configure(handlers::messages_config)
    .configure(handlers::reviews_config)
    .configure(handlers::admin_config);
}
