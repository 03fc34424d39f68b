// src/models/user.rs
// DOCUMENTATION: User accounts (familles, professionnels, admins)
// PURPOSE: Database row, request DTOs and the public/private response shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::Badge;

/// Account type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
    Famille,
    Professionnel,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Famille => "famille",
            Role::Professionnel => "professionnel",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "famille" => Ok(Role::Famille),
            "professionnel" => Ok(Role::Professionnel),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Complete user record from the database
/// DOCUMENTATION: Maps directly to the users table; never serialized as-is
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub bio: Option<String>,
    pub hourly_rate: Option<f64>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub role: Role,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 10))]
    pub postal_code: Option<String>,

    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    #[validate(range(min = 0.01, max = 1000.0))]
    pub hourly_rate: Option<f64>,
}

/// Login payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Password change payload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,

    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Partial profile update, only provided fields are written
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,

    #[validate(length(max = 30))]
    pub phone: Option<String>,

    #[validate(length(max = 255))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 10))]
    pub postal_code: Option<String>,

    #[validate(length(max = 2000))]
    pub bio: Option<String>,

    #[validate(range(min = 0.01, max = 1000.0))]
    pub hourly_rate: Option<f64>,
}

/// Account view returned to the account owner and to admins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub bio: Option<String>,
    pub hourly_rate: Option<f64>,
    pub is_verified: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Profile visible to other users: no contact details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: i64,
    pub role: Role,
    pub first_name: String,
    /// Initial only, e.g. "D."
    pub last_name_initial: String,
    pub city: Option<String>,
    pub bio: Option<String>,
    pub hourly_rate: Option<f64>,
    pub is_verified: bool,
    pub average_rating: Option<f64>,
    pub review_count: i64,
    pub badges: Vec<Badge>,
}

/// Contact details, released once a reservation is paid
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactInfo {
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

/// Token + account returned by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Query string for the professionnel directory
#[derive(Debug, Default, Deserialize)]
pub struct ProfessionnelQuery {
    pub city: Option<String>,
    pub min_rating: Option<f64>,
    pub verified_only: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query string for the admin user list
#[derive(Debug, Default, Deserialize)]
pub struct AdminUserQuery {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Admin suspension toggle
#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            bio: self.bio.clone(),
            hourly_rate: self.hourly_rate,
            is_verified: self.is_verified,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }

    pub fn to_contact(&self) -> ContactInfo {
        ContactInfo {
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
        }
    }

    pub fn to_public(
        &self,
        rating: Option<&super::UserRating>,
        badges: Vec<Badge>,
    ) -> PublicProfile {
        PublicProfile {
            id: self.id,
            role: self.role,
            first_name: self.first_name.clone(),
            last_name_initial: self
                .last_name
                .chars()
                .next()
                .map(|c| format!("{}.", c.to_uppercase()))
                .unwrap_or_default(),
            city: self.city.clone(),
            bio: self.bio.clone(),
            hourly_rate: self.hourly_rate,
            is_verified: self.is_verified,
            average_rating: rating
                .filter(|r| r.review_count > 0)
                .map(|r| (r.average_rating * 100.0).round() / 100.0),
            review_count: rating.map(|r| r.review_count).unwrap_or(0),
            badges,
        }
    }
}

/// Normalize an e-mail address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "marie@example.fr".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Professionnel,
            first_name: "Marie".to_string(),
            last_name: "dupont".to_string(),
            phone: Some("0600000000".to_string()),
            address: Some("1 rue de la Paix".to_string()),
            city: Some("Lyon".to_string()),
            postal_code: Some("69001".to_string()),
            bio: None,
            hourly_rate: Some(18.5),
            is_verified: true,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_profile_hides_contact_details() {
        let profile = sample_user().to_public(None, vec![Badge::Verifie]);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(profile.last_name_initial, "D.");
        assert!(json.get("email").is_none());
        assert!(json.get("phone").is_none());
        assert!(json.get("address").is_none());
        assert_eq!(json["role"], "professionnel");
        assert_eq!(json["badges"][0], "verifie");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("famille".parse::<Role>(), Ok(Role::Famille));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jean.Martin@Example.FR "), "jean.martin@example.fr");
    }
}
