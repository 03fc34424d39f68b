// src/auth/mod.rs
// DOCUMENTATION: Authentication and authorization
// PURPOSE: Password hashing, JWT issuance and the request extractors

pub mod extractor;
pub mod jwt;
pub mod password;

pub use extractor::{AdminUser, AuthUser};
pub use jwt::{Claims, JwtManager};
pub use password::{hash_password, verify_password};
