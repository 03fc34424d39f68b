// src/bin/create_admin.rs
// DOCUMENTATION: Bootstrap an administrator account
// PURPOSE: Admins cannot self-register, this is the only way to create one
//
// Usage:
//   ADMIN_EMAIL=admin@domicare.fr ADMIN_PASSWORD=... cargo run --bin create_admin
// Optional: ADMIN_FIRST_NAME, ADMIN_LAST_NAME
// An existing account with that e-mail is promoted and its password reset.

use anyhow::{bail, Context, Result};
use domicare_api::auth::hash_password;
use domicare_api::config::{self, Config};
use domicare_api::db::{NewUser, UserRepository};
use domicare_api::models::{normalize_email, Role};
use dotenv::dotenv;
use std::env;

const MIN_PASSWORD_LENGTH: usize = 8;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info,sqlx=warn");
    }
    env_logger::init();

    let email = normalize_email(&env::var("ADMIN_EMAIL").context("ADMIN_EMAIL is required")?);
    let password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is required")?;
    let first_name = env::var("ADMIN_FIRST_NAME").unwrap_or_else(|_| "Admin".to_string());
    let last_name = env::var("ADMIN_LAST_NAME").unwrap_or_else(|_| "Domicare".to_string());

    if !email.contains('@') {
        bail!("ADMIN_EMAIL is not a valid e-mail address");
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!(
            "ADMIN_PASSWORD must be at least {} characters",
            MIN_PASSWORD_LENGTH
        );
    }

    let config = Config::from_env();
    let pool = config::init_db_pool(&config)
        .await
        .context("failed to open the database")?;

    let password_hash = hash_password(&password)?;

    match UserRepository::find_by_email(&pool, &email).await? {
        Some(user) => {
            UserRepository::set_role(&pool, user.id, Role::Admin).await?;
            UserRepository::update_password(&pool, user.id, &password_hash).await?;
            UserRepository::set_active(&pool, user.id, true).await?;
            log::info!("Promoted existing account {} (id {}) to admin", email, user.id);
        }
        None => {
            let user = UserRepository::insert(
                &pool,
                NewUser {
                    email: &email,
                    password_hash: &password_hash,
                    role: Role::Admin,
                    first_name: &first_name,
                    last_name: &last_name,
                    phone: None,
                    address: None,
                    city: None,
                    postal_code: None,
                    bio: None,
                    hourly_rate: None,
                },
            )
            .await?;
            log::info!("Created admin account {} (id {})", email, user.id);
        }
    }

    pool.close().await;
    Ok(())
}
