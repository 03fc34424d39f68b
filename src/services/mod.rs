// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod admin_service;
pub mod auth_service;
pub mod badge_service;
pub mod document_service;
pub mod message_service;
pub mod payment_provider;
pub mod payment_service;
pub mod pricing;
pub mod rate_limit;
pub mod reservation_service;
pub mod review_service;
pub mod user_service;

pub use admin_service::*;
pub use auth_service::*;
pub use badge_service::*;
pub use document_service::*;
pub use message_service::*;
pub use payment_provider::*;
pub use payment_service::*;
pub use rate_limit::*;
pub use reservation_service::*;
pub use review_service::*;
pub use user_service::*;
