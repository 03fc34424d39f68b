// src/db/user_repository.rs
// DOCUMENTATION: Database access for user accounts
// PURPOSE: All SQL touching the users table

use crate::errors::DomicareError;
use crate::models::*;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// UserRepository: All database operations for accounts
pub struct UserRepository;

impl UserRepository {
    /// Insert a new account
    /// DOCUMENTATION: `email` must already be normalized, duplicate e-mails map to AlreadyExists
    pub async fn create(
        pool: &SqlitePool,
        req: &RegisterRequest,
        email: &str,
        password_hash: &str,
    ) -> Result<User, DomicareError> {
        Self::insert(
            pool,
            NewUser {
                email,
                password_hash,
                role: req.role,
                first_name: req.first_name.trim(),
                last_name: req.last_name.trim(),
                phone: req.phone.as_deref(),
                address: req.address.as_deref(),
                city: req.city.as_deref(),
                postal_code: req.postal_code.as_deref(),
                bio: req.bio.as_deref(),
                hourly_rate: req.hourly_rate,
            },
        )
        .await
    }

    pub async fn insert(pool: &SqlitePool, new: NewUser<'_>) -> Result<User, DomicareError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO users (
                email, password_hash, role, first_name, last_name,
                phone, address, city, postal_code, bio, hourly_rate,
                is_verified, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 0, 1, $12, $12)
            "#,
        )
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.phone)
        .bind(new.address)
        .bind(new.city)
        .bind(new.postal_code)
        .bind(new.bio)
        .bind(new.hourly_rate)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                log::warn!("Registration with existing e-mail: {}", new.email);
                DomicareError::AlreadyExists(format!("An account already uses {}", new.email))
            }
            other => {
                log::error!("Failed to create user: {}", other);
                DomicareError::DatabaseError(other.to_string())
            }
        })?;

        let user = Self::get_by_id(pool, result.last_insert_rowid()).await?;
        log::info!("Created {} account {}", user.role, user.id);
        Ok(user)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, DomicareError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching user {}: {}", id, e);
                DomicareError::DatabaseError(e.to_string())
            })
    }

    /// Retrieve user by ID, NotFound when missing
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<User, DomicareError> {
        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| DomicareError::NotFound(format!("User {}", id)))
    }

    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<User>, DomicareError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching user by e-mail: {}", e);
                DomicareError::DatabaseError(e.to_string())
            })
    }

    /// Partial update - only provided fields are modified
    pub async fn update_profile(
        pool: &SqlitePool,
        id: i64,
        req: &UpdateProfileRequest,
    ) -> Result<User, DomicareError> {
        let rows = sqlx::query(
            r#"
            UPDATE users
            SET first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                postal_code = COALESCE($6, postal_code),
                bio = COALESCE($7, bio),
                hourly_rate = COALESCE($8, hourly_rate),
                updated_at = $9
            WHERE id = $10
            "#,
        )
        .bind(req.first_name.as_deref().map(str::trim))
        .bind(req.last_name.as_deref().map(str::trim))
        .bind(&req.phone)
        .bind(&req.address)
        .bind(&req.city)
        .bind(&req.postal_code)
        .bind(&req.bio)
        .bind(req.hourly_rate)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Profile update failed for user {}: {}", id, e);
            DomicareError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows == 0 {
            return Err(DomicareError::NotFound(format!("User {}", id)));
        }

        Self::get_by_id(pool, id).await
    }

    pub async fn update_password(
        pool: &SqlitePool,
        id: i64,
        password_hash: &str,
    ) -> Result<(), DomicareError> {
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Suspend or reactivate an account
    pub async fn set_active(
        pool: &SqlitePool,
        id: i64,
        is_active: bool,
    ) -> Result<User, DomicareError> {
        let rows = sqlx::query("UPDATE users SET is_active = $1, updated_at = $2 WHERE id = $3")
            .bind(is_active)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(DomicareError::NotFound(format!("User {}", id)));
        }

        Self::get_by_id(pool, id).await
    }

    pub async fn set_verified(
        pool: &SqlitePool,
        id: i64,
        is_verified: bool,
    ) -> Result<(), DomicareError> {
        sqlx::query("UPDATE users SET is_verified = $1, updated_at = $2 WHERE id = $3")
            .bind(is_verified)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_role(pool: &SqlitePool, id: i64, role: Role) -> Result<(), DomicareError> {
        sqlx::query("UPDATE users SET role = $1, updated_at = $2 WHERE id = $3")
            .bind(role)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Soft delete
    /// DOCUMENTATION: Deactivates the account and strips personal data; rows
    /// referenced by reservations, payments and messages stay intact
    pub async fn soft_delete(pool: &SqlitePool, id: i64) -> Result<(), DomicareError> {
        let rows = sqlx::query(
            r#"
            UPDATE users
            SET is_active = 0,
                email = 'supprime-' || id || '@deleted.invalid',
                phone = NULL,
                address = NULL,
                postal_code = NULL,
                bio = NULL,
                updated_at = $1
            WHERE id = $2
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Delete failed for user {}: {}", id, e);
            DomicareError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows == 0 {
            return Err(DomicareError::NotFound(format!("User {}", id)));
        }

        log::info!("Deleted user: {}", id);
        Ok(())
    }

    /// Public directory of active professionnels
    /// Returns tuple: (results, total_count) for pagination
    pub async fn search_professionnels(
        pool: &SqlitePool,
        query: &ProfessionnelQuery,
        page: PageParams,
    ) -> Result<(Vec<User>, i64), DomicareError> {
        fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &ProfessionnelQuery) {
            qb.push(" WHERE u.role = 'professionnel' AND u.is_active = 1");

            if let Some(city) = query.city.as_deref().filter(|c| !c.trim().is_empty()) {
                qb.push(" AND LOWER(u.city) LIKE ")
                    .push_bind(contains_pattern(city))
                    .push(" ESCAPE '\\'");
            }

            if query.verified_only.unwrap_or(false) {
                qb.push(" AND u.is_verified = 1");
            }

            if let Some(min_rating) = query.min_rating {
                qb.push(" AND COALESCE(r.average_rating, 0.0) >= ")
                    .push_bind(min_rating);
            }
        }

        let base = "FROM users u LEFT JOIN user_ratings r ON r.user_id = u.id";

        let mut count_qb = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) {}", base));
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Count query error: {}", e);
                DomicareError::DatabaseError(e.to_string())
            })?;

        let mut qb = QueryBuilder::<Sqlite>::new(format!("SELECT u.* {}", base));
        push_filters(&mut qb, query);
        qb.push(" ORDER BY u.is_verified DESC, COALESCE(r.average_rating, 0.0) DESC, u.id ASC");
        qb.push(" LIMIT ").push_bind(page.limit);
        qb.push(" OFFSET ").push_bind(page.offset());

        let users = qb
            .build_query_as::<User>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Professionnel search error: {}", e);
                DomicareError::DatabaseError(e.to_string())
            })?;

        log::debug!(
            "Professionnel search: {} results, {} total (page {})",
            users.len(),
            total,
            page.page
        );

        Ok((users, total))
    }

    /// Admin user list with role, status and free-text filters
    pub async fn list_for_admin(
        pool: &SqlitePool,
        query: &AdminUserQuery,
        page: PageParams,
    ) -> Result<(Vec<User>, i64), DomicareError> {
        fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, query: &AdminUserQuery) {
            qb.push(" WHERE 1 = 1");

            if let Some(role) = query.role {
                qb.push(" AND role = ").push_bind(role);
            }

            if let Some(is_active) = query.is_active {
                qb.push(" AND is_active = ").push_bind(is_active);
            }

            if let Some(q) = query.q.as_deref().filter(|q| !q.trim().is_empty()) {
                let pattern = contains_pattern(q);
                qb.push(" AND (LOWER(email) LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\' OR LOWER(first_name) LIKE ")
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\' OR LOWER(last_name) LIKE ")
                    .push_bind(pattern)
                    .push(" ESCAPE '\\')");
            }
        }

        let mut count_qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM users");
        push_filters(&mut qb, query);
        qb.push(" ORDER BY created_at DESC, id DESC");
        qb.push(" LIMIT ").push_bind(page.limit);
        qb.push(" OFFSET ").push_bind(page.offset());

        let users = qb.build_query_as::<User>().fetch_all(pool).await?;
        Ok((users, total))
    }

    /// Whether the two users share at least one reservation
    pub async fn share_reservation(
        pool: &SqlitePool,
        a: i64,
        b: i64,
    ) -> Result<bool, DomicareError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE (famille_id = $1 AND professionnel_id = $2)
               OR (famille_id = $2 AND professionnel_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }
}

/// Case-insensitive substring pattern for LIKE ... ESCAPE '\'
/// User input is matched literally: `%`, `_` and `\` are escaped
fn contains_pattern(input: &str) -> String {
    let mut pattern = String::from("%");
    for c in input.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Column values for a new account
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub hourly_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern(" Lyon "), "%lyon%");
        assert_eq!(contains_pattern("%"), "%\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\x"), "%c:\\\\x%");
    }
}
