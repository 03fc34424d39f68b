// src/db/reservation_repository.rs
// DOCUMENTATION: Reservation persistence
// PURPOSE: Inserts, lookups, listings and status writes for reservations

use crate::errors::DomicareError;
use crate::models::{Reservation, ReservationStatus, Role};
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

pub struct ReservationRepository;

/// Column values for a new reservation, price already computed
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub famille_id: i64,
    pub professionnel_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub hours_per_day: f64,
    pub hourly_rate: f64,
    pub total_price: f64,
    pub notes: Option<String>,
}

impl ReservationRepository {
    pub async fn create(
        pool: &SqlitePool,
        new: &NewReservation,
    ) -> Result<Reservation, DomicareError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO reservations (
                famille_id, professionnel_id, start_date, end_date, start_time, end_time,
                hours_per_day, hourly_rate, total_price, status, notes,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'en_attente', $10, $11, $11)
            "#,
        )
        .bind(new.famille_id)
        .bind(new.professionnel_id)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(&new.start_time)
        .bind(&new.end_time)
        .bind(new.hours_per_day)
        .bind(new.hourly_rate)
        .bind(new.total_price)
        .bind(&new.notes)
        .bind(now)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create reservation: {}", e);
            DomicareError::DatabaseError(e.to_string())
        })?;

        let reservation = Self::get_by_id(pool, result.last_insert_rowid()).await?;
        log::info!(
            "Created reservation {} (famille {}, professionnel {})",
            reservation.id,
            reservation.famille_id,
            reservation.professionnel_id
        );
        Ok(reservation)
    }

    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Reservation, DomicareError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching reservation {}: {}", id, e);
                DomicareError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Reservation not found: {}", id);
                DomicareError::NotFound(format!("Reservation {}", id))
            })
    }

    /// Reservations visible to a user: own side for familles and
    /// professionnels, everything for admins
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: i64,
        role: Role,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>, DomicareError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM reservations WHERE 1 = 1");

        match role {
            Role::Famille => {
                qb.push(" AND famille_id = ").push_bind(user_id);
            }
            Role::Professionnel => {
                qb.push(" AND professionnel_id = ").push_bind(user_id);
            }
            Role::Admin => {}
        }

        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status);
        }

        qb.push(" ORDER BY created_at DESC, id DESC");

        let reservations = qb
            .build_query_as::<Reservation>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Reservation listing failed for user {}: {}", user_id, e);
                DomicareError::DatabaseError(e.to_string())
            })?;

        Ok(reservations)
    }

    /// Write a new status; `expected` guards against concurrent changes
    pub async fn update_status(
        pool: &SqlitePool,
        id: i64,
        expected: ReservationStatus,
        status: ReservationStatus,
        cancellation_reason: Option<&str>,
    ) -> Result<Reservation, DomicareError> {
        let mut conn = pool.acquire().await?;
        Self::update_status_in(&mut conn, id, expected, status, cancellation_reason).await?;
        drop(conn);
        Self::get_by_id(pool, id).await
    }

    /// Same as update_status, on a caller-owned connection or transaction
    pub async fn update_status_in(
        conn: &mut SqliteConnection,
        id: i64,
        expected: ReservationStatus,
        status: ReservationStatus,
        cancellation_reason: Option<&str>,
    ) -> Result<(), DomicareError> {
        let rows = sqlx::query(
            r#"
            UPDATE reservations
            SET status = $1,
                cancellation_reason = COALESCE($2, cancellation_reason),
                updated_at = $3
            WHERE id = $4 AND status = $5
            "#,
        )
        .bind(status)
        .bind(cancellation_reason)
        .bind(Utc::now())
        .bind(id)
        .bind(expected)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            log::error!("Status update failed for reservation {}: {}", id, e);
            DomicareError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows == 0 {
            return Err(DomicareError::InvalidTransition {
                from: expected.to_string(),
                to: status.to_string(),
            });
        }

        log::info!("Reservation {}: {} -> {}", id, expected, status);
        Ok(())
    }

    /// Completed reservations of a professionnel
    pub async fn count_completed_for(
        pool: &SqlitePool,
        professionnel_id: i64,
    ) -> Result<i64, DomicareError> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reservations WHERE professionnel_id = $1 AND status = 'terminee'",
        )
        .bind(professionnel_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
