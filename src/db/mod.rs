// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod badge_repository;
pub mod document_repository;
pub mod message_repository;
pub mod payment_repository;
pub mod reservation_repository;
pub mod review_repository;
pub mod stats_repository;
pub mod user_repository;

pub use badge_repository::*;
pub use document_repository::*;
pub use message_repository::*;
pub use payment_repository::*;
pub use reservation_repository::*;
pub use review_repository::*;
pub use stats_repository::*;
pub use user_repository::*;
