// src/services/payment_service.rs
// DOCUMENTATION: Payment intents and confirmation
// PURPOSE: Moves an accepted reservation to payee once the provider
// reports the intent as succeeded

use crate::config::Config;
use crate::db::{PaymentRepository, ReservationRepository};
use crate::errors::DomicareError;
use crate::models::{
    to_minor_units, transition_allowed, Actor, Payment, PaymentIntentResponse, PaymentStatus,
    ReservationStatus, User,
};
use crate::services::{IntentOutcome, PaymentProvider};
use sqlx::SqlitePool;

pub struct PaymentService;

impl PaymentService {
    /// Open (or reuse) a payment intent for an accepted reservation
    pub async fn create_intent(
        pool: &SqlitePool,
        provider: &PaymentProvider,
        config: &Config,
        famille: &User,
        reservation_id: i64,
    ) -> Result<PaymentIntentResponse, DomicareError> {
        let reservation = ReservationRepository::get_by_id(pool, reservation_id).await?;

        if reservation.famille_id != famille.id {
            return Err(DomicareError::Forbidden(
                "Only the famille of this reservation can pay it".to_string(),
            ));
        }

        if reservation.status != ReservationStatus::Acceptee {
            return Err(DomicareError::InvalidTransition {
                from: reservation.status.to_string(),
                to: ReservationStatus::Payee.to_string(),
            });
        }

        if let Some(existing) =
            PaymentRepository::find_pending_for_reservation(pool, reservation_id).await?
        {
            let intent = provider
                .retrieve_intent(&existing.provider_payment_id)
                .await?;
            log::debug!(
                "Reusing payment {} for reservation {}",
                existing.id,
                reservation_id
            );
            return Ok(PaymentIntentResponse {
                client_secret: intent.client_secret,
                payment: existing,
            });
        }

        let intent = provider
            .create_intent(
                to_minor_units(reservation.total_price),
                &config.payment_currency,
                reservation.id,
            )
            .await?;

        let payment = PaymentRepository::create(
            pool,
            reservation.id,
            famille.id,
            reservation.total_price,
            &config.payment_currency,
            &intent.id,
        )
        .await?;

        log::info!(
            "Payment {} opened via {} for reservation {} ({:.2} {})",
            payment.id,
            provider.name(),
            reservation.id,
            payment.amount,
            payment.currency
        );

        Ok(PaymentIntentResponse {
            payment,
            client_secret: intent.client_secret,
        })
    }

    /// Sync a payment with the provider's view of its intent
    pub async fn confirm(
        pool: &SqlitePool,
        provider: &PaymentProvider,
        user: &User,
        payment_intent_id: &str,
    ) -> Result<Payment, DomicareError> {
        let payment = PaymentRepository::find_by_provider_id(pool, payment_intent_id)
            .await?
            .ok_or_else(|| DomicareError::NotFound(format!("Payment {}", payment_intent_id)))?;

        if payment.famille_id != user.id && !user.is_admin() {
            return Err(DomicareError::Forbidden(
                "You cannot confirm this payment".to_string(),
            ));
        }

        if payment.status != PaymentStatus::EnAttente {
            log::debug!(
                "Payment {} already settled as {:?}",
                payment.id,
                payment.status
            );
            return Ok(payment);
        }

        let intent = provider.retrieve_intent(payment_intent_id).await?;

        match intent.outcome {
            IntentOutcome::Succeeded => Self::settle(pool, &payment).await,
            IntentOutcome::Failed => {
                log::info!("Payment {} failed at the provider", payment.id);
                PaymentRepository::set_status(pool, payment.id, PaymentStatus::Echoue).await
            }
            IntentOutcome::Pending => Ok(payment),
        }
    }

    /// Mark the payment successful and the reservation paid, atomically
    async fn settle(pool: &SqlitePool, payment: &Payment) -> Result<Payment, DomicareError> {
        let reservation = ReservationRepository::get_by_id(pool, payment.reservation_id).await?;

        if !transition_allowed(
            reservation.status,
            ReservationStatus::Payee,
            Actor::PaymentSystem,
            false,
        ) {
            log::error!(
                "Payment {} succeeded but reservation {} is {}",
                payment.id,
                reservation.id,
                reservation.status
            );
            return Err(DomicareError::InvalidTransition {
                from: reservation.status.to_string(),
                to: ReservationStatus::Payee.to_string(),
            });
        }

        let mut tx = pool.begin().await?;
        PaymentRepository::set_status_in(&mut *tx, payment.id, PaymentStatus::Reussi).await?;
        ReservationRepository::update_status_in(
            &mut *tx,
            reservation.id,
            ReservationStatus::Acceptee,
            ReservationStatus::Payee,
            None,
        )
        .await?;
        tx.commit().await?;

        log::info!(
            "Payment {} succeeded, reservation {} is paid",
            payment.id,
            reservation.id
        );

        PaymentRepository::get_by_id(pool, payment.id).await
    }

    pub async fn list(
        pool: &SqlitePool,
        user: &User,
        status: Option<PaymentStatus>,
    ) -> Result<Vec<Payment>, DomicareError> {
        PaymentRepository::list_for_user(pool, user.id, user.role, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{accepted_reservation, seed_famille, test_pool};

    #[tokio::test]
    async fn test_intent_then_confirm_marks_reservation_paid() {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let provider = PaymentProvider::Simulated;
        let (famille, _pro, reservation) = accepted_reservation(&pool).await;

        let opened = PaymentService::create_intent(&pool, &provider, &config, &famille, reservation.id)
            .await
            .unwrap();
        assert_eq!(opened.payment.status, PaymentStatus::EnAttente);
        assert_eq!(opened.payment.amount, reservation.total_price);

        // second call reuses the open payment
        let again = PaymentService::create_intent(&pool, &provider, &config, &famille, reservation.id)
            .await
            .unwrap();
        assert_eq!(again.payment.id, opened.payment.id);

        let paid = PaymentService::confirm(
            &pool,
            &provider,
            &famille,
            &opened.payment.provider_payment_id,
        )
        .await
        .unwrap();
        assert_eq!(paid.status, PaymentStatus::Reussi);

        let reservation = ReservationRepository::get_by_id(&pool, reservation.id)
            .await
            .unwrap();
        assert_eq!(reservation.status, ReservationStatus::Payee);

        // idempotent
        let replay = PaymentService::confirm(
            &pool,
            &provider,
            &famille,
            &opened.payment.provider_payment_id,
        )
        .await
        .unwrap();
        assert_eq!(replay.status, PaymentStatus::Reussi);
    }

    #[tokio::test]
    async fn test_intent_requires_owner_and_accepted_status() {
        let pool = test_pool().await;
        let config = Config::for_tests();
        let provider = PaymentProvider::Simulated;
        let (famille, pro, reservation) = accepted_reservation(&pool).await;
        let stranger = seed_famille(&pool, "stranger@example.fr").await;

        let result =
            PaymentService::create_intent(&pool, &provider, &config, &stranger, reservation.id)
                .await;
        assert!(matches!(result, Err(DomicareError::Forbidden(_))));

        ReservationRepository::update_status(
            &pool,
            reservation.id,
            ReservationStatus::Acceptee,
            ReservationStatus::Annulee,
            Some("Changement de planning"),
        )
        .await
        .unwrap();

        let result =
            PaymentService::create_intent(&pool, &provider, &config, &famille, reservation.id)
                .await;
        assert!(matches!(result, Err(DomicareError::InvalidTransition { .. })));

        let visible = PaymentService::list(&pool, &pro, None).await.unwrap();
        assert!(visible.is_empty());
    }

    #[tokio::test]
    async fn test_confirm_unknown_intent_is_not_found() {
        let pool = test_pool().await;
        let famille = seed_famille(&pool, "famille@example.fr").await;

        let result =
            PaymentService::confirm(&pool, &PaymentProvider::Simulated, &famille, "pi_sim_x").await;
        assert!(matches!(result, Err(DomicareError::NotFound(_))));
    }
}
