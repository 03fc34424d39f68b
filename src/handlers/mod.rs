// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod admin;
pub mod auth;
pub mod documents;
pub mod health;
pub mod messages;
pub mod payments;
pub mod reservations;
pub mod reviews;
pub mod users;

pub use admin::config as admin_config;
pub use auth::config as auth_config;
pub use documents::config as documents_config;
pub use health::config as health_config;
pub use messages::config as messages_config;
pub use payments::config as payments_config;
pub use reservations::config as reservations_config;
pub use reviews::config as reviews_config;
pub use users::config as users_config;
