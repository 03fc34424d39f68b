// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod document;
pub mod message;
pub mod pagination;
pub mod payment;
pub mod reservation;
pub mod review;
pub mod stats;
pub mod user;

pub use document::*;
pub use message::*;
pub use pagination::*;
pub use payment::*;
pub use reservation::*;
pub use review::*;
pub use stats::*;
pub use user::*;
