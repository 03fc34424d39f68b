// src/db/payment_repository.rs
// DOCUMENTATION: Payment persistence

use crate::errors::DomicareError;
use crate::models::{Payment, PaymentStatus, Role};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

pub struct PaymentRepository;

impl PaymentRepository {
    pub async fn create(
        pool: &SqlitePool,
        reservation_id: i64,
        famille_id: i64,
        amount: f64,
        currency: &str,
        provider_payment_id: &str,
    ) -> Result<Payment, DomicareError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO payments (
                reservation_id, famille_id, amount, currency, provider_payment_id,
                status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, 'en_attente', $6, $6)
            "#,
        )
        .bind(reservation_id)
        .bind(famille_id)
        .bind(amount)
        .bind(currency)
        .bind(provider_payment_id)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to record payment for reservation {}: {}", reservation_id, e);
            DomicareError::DatabaseError(e.to_string())
        })?;

        Self::get_by_id(pool, result.last_insert_rowid()).await
    }

    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Payment, DomicareError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DomicareError::NotFound(format!("Payment {}", id)))
    }

    pub async fn find_by_provider_id(
        pool: &SqlitePool,
        provider_payment_id: &str,
    ) -> Result<Option<Payment>, DomicareError> {
        let payment =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE provider_payment_id = $1")
                .bind(provider_payment_id)
                .fetch_optional(pool)
                .await?;
        Ok(payment)
    }

    /// Open payment for a reservation, if any
    pub async fn find_pending_for_reservation(
        pool: &SqlitePool,
        reservation_id: i64,
    ) -> Result<Option<Payment>, DomicareError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE reservation_id = $1 AND status = 'en_attente'
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(reservation_id)
        .fetch_optional(pool)
        .await?;
        Ok(payment)
    }

    pub async fn find_successful_for_reservation(
        pool: &SqlitePool,
        reservation_id: i64,
    ) -> Result<Option<Payment>, DomicareError> {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE reservation_id = $1 AND status = 'reussi' LIMIT 1",
        )
        .bind(reservation_id)
        .fetch_optional(pool)
        .await?;
        Ok(payment)
    }

    pub async fn set_status(
        pool: &SqlitePool,
        id: i64,
        status: PaymentStatus,
    ) -> Result<Payment, DomicareError> {
        let mut conn = pool.acquire().await?;
        Self::set_status_in(&mut conn, id, status).await?;
        drop(conn);
        Self::get_by_id(pool, id).await
    }

    pub async fn set_status_in(
        conn: &mut SqliteConnection,
        id: i64,
        status: PaymentStatus,
    ) -> Result<(), DomicareError> {
        sqlx::query("UPDATE payments SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                log::error!("Payment {} status update failed: {}", id, e);
                DomicareError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }

    /// Payments visible to a user
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: i64,
        role: Role,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>, DomicareError> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT p.* FROM payments p JOIN reservations r ON r.id = p.reservation_id WHERE 1 = 1",
        );

        match role {
            Role::Famille => {
                qb.push(" AND p.famille_id = ").push_bind(user_id);
            }
            Role::Professionnel => {
                qb.push(" AND r.professionnel_id = ").push_bind(user_id);
            }
            Role::Admin => {}
        }

        if let Some(status) = status {
            qb.push(" AND p.status = ").push_bind(status);
        }

        qb.push(" ORDER BY p.created_at DESC, p.id DESC");

        let payments = qb.build_query_as::<Payment>().fetch_all(pool).await?;
        Ok(payments)
    }

    /// Sum of successful payments
    pub async fn total_revenue(pool: &SqlitePool) -> Result<f64, DomicareError> {
        let total = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0.0) FROM payments WHERE status = 'reussi'",
        )
        .fetch_one(pool)
        .await?;
        Ok(total)
    }
}
