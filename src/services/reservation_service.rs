// src/services/reservation_service.rs
// DOCUMENTATION: Reservation booking and lifecycle
// PURPOSE: Quotes, creation, gated views and status transitions

use crate::db::{
    NewReservation, PaymentRepository, ReservationRepository, UserRepository,
};
use crate::errors::DomicareError;
use crate::models::{
    transition_allowed, CreateReservationRequest, PaymentStatus, PriceQuote, QuoteRequest,
    Reservation, ReservationContacts, ReservationStatus, ReservationView, Role,
    UpdateReservationStatusRequest, User,
};
use crate::services::{pricing, BadgeService, PaymentProvider, UserService};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

/// Contact details a viewer may see on a reservation
/// DOCUMENTATION: Participants get the counterpart once the reservation is paid,
/// admins always get both sides
pub fn visible_contacts(
    reservation: &Reservation,
    viewer: &User,
    famille: &User,
    professionnel: &User,
) -> Option<ReservationContacts> {
    if viewer.is_admin() {
        return Some(ReservationContacts {
            famille: Some(famille.to_contact()),
            professionnel: Some(professionnel.to_contact()),
        });
    }

    if !reservation.status.unlocks_contact() || !reservation.is_participant(viewer.id) {
        return None;
    }

    if viewer.id == reservation.famille_id {
        Some(ReservationContacts {
            famille: None,
            professionnel: Some(professionnel.to_contact()),
        })
    } else {
        Some(ReservationContacts {
            famille: Some(famille.to_contact()),
            professionnel: None,
        })
    }
}

pub struct ReservationService;

impl ReservationService {
    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    async fn bookable_professionnel(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<User, DomicareError> {
        let pro = UserRepository::find_by_id(pool, id)
            .await?
            .filter(|u| u.role == Role::Professionnel && u.is_active)
            .ok_or_else(|| DomicareError::NotFound(format!("Professionnel {}", id)))?;
        Ok(pro)
    }

    pub async fn quote(
        pool: &SqlitePool,
        req: &QuoteRequest,
    ) -> Result<PriceQuote, DomicareError> {
        let pro = Self::bookable_professionnel(pool, req.professionnel_id).await?;
        pricing::quote(req, pro.hourly_rate, Self::today())
    }

    pub async fn create(
        pool: &SqlitePool,
        famille: &User,
        req: CreateReservationRequest,
    ) -> Result<ReservationView, DomicareError> {
        if famille.role != Role::Famille {
            return Err(DomicareError::Forbidden(
                "Only familles can book a professionnel".to_string(),
            ));
        }

        let pro = Self::bookable_professionnel(pool, req.slot.professionnel_id).await?;
        let quote = pricing::quote(&req.slot, pro.hourly_rate, Self::today())?;

        let notes = req
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let reservation = ReservationRepository::create(
            pool,
            &NewReservation {
                famille_id: famille.id,
                professionnel_id: pro.id,
                start_date: req.slot.start_date,
                end_date: req.slot.end_date,
                start_time: req.slot.start_time,
                end_time: req.slot.end_time,
                hours_per_day: quote.hours_per_day,
                hourly_rate: quote.hourly_rate,
                total_price: quote.total_price,
                notes,
            },
        )
        .await?;

        Self::build_view(pool, famille, reservation).await
    }

    pub async fn list(
        pool: &SqlitePool,
        viewer: &User,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<ReservationView>, DomicareError> {
        let reservations =
            ReservationRepository::list_for_user(pool, viewer.id, viewer.role, status).await?;

        let mut views = Vec::with_capacity(reservations.len());
        for reservation in reservations {
            views.push(Self::build_view(pool, viewer, reservation).await?);
        }
        Ok(views)
    }

    pub async fn get(
        pool: &SqlitePool,
        viewer: &User,
        id: i64,
    ) -> Result<ReservationView, DomicareError> {
        let reservation = ReservationRepository::get_by_id(pool, id).await?;
        if !viewer.is_admin() && !reservation.is_participant(viewer.id) {
            return Err(DomicareError::Forbidden(
                "You are not part of this reservation".to_string(),
            ));
        }
        Self::build_view(pool, viewer, reservation).await
    }

    /// Apply a user-requested status change
    pub async fn change_status(
        pool: &SqlitePool,
        provider: &PaymentProvider,
        user: &User,
        id: i64,
        req: UpdateReservationStatusRequest,
    ) -> Result<ReservationView, DomicareError> {
        let reservation = ReservationRepository::get_by_id(pool, id).await?;
        let actor = reservation.actor_for(user.id, user.role).ok_or_else(|| {
            DomicareError::Forbidden("You are not part of this reservation".to_string())
        })?;

        let from = reservation.status;
        let to = req.status;
        let service_ended = reservation.end_date <= Self::today();

        if !transition_allowed(from, to, actor, service_ended) {
            log::warn!(
                "Rejected transition {} -> {} on reservation {} by user {} ({:?})",
                from,
                to,
                id,
                user.id,
                actor
            );
            return Err(DomicareError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let reason = req
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        // Refund before the status write so a provider failure leaves the reservation paid
        if from == ReservationStatus::Payee && to == ReservationStatus::Annulee {
            Self::refund(pool, provider, &reservation).await?;
        }

        let updated = ReservationRepository::update_status(
            pool,
            id,
            from,
            to,
            if to == ReservationStatus::Annulee {
                reason
            } else {
                None
            },
        )
        .await?;

        if to == ReservationStatus::Terminee {
            BadgeService::evaluate_experience(pool, updated.professionnel_id).await?;
        }

        Self::build_view(pool, user, updated).await
    }

    async fn refund(
        pool: &SqlitePool,
        provider: &PaymentProvider,
        reservation: &Reservation,
    ) -> Result<(), DomicareError> {
        match PaymentRepository::find_successful_for_reservation(pool, reservation.id).await? {
            Some(payment) => {
                provider.refund(&payment.provider_payment_id).await?;
                PaymentRepository::set_status(pool, payment.id, PaymentStatus::Rembourse).await?;
                log::info!(
                    "Refunded payment {} ({:.2} {}) for reservation {}",
                    payment.id,
                    payment.amount,
                    payment.currency,
                    reservation.id
                );
            }
            None => log::warn!(
                "Paid reservation {} has no successful payment to refund",
                reservation.id
            ),
        }
        Ok(())
    }

    /// Reservation with both public profiles and the contacts the viewer may see
    pub async fn build_view(
        pool: &SqlitePool,
        viewer: &User,
        reservation: Reservation,
    ) -> Result<ReservationView, DomicareError> {
        let famille = UserRepository::get_by_id(pool, reservation.famille_id).await?;
        let professionnel = UserRepository::get_by_id(pool, reservation.professionnel_id).await?;

        let contact = visible_contacts(&reservation, viewer, &famille, &professionnel);

        Ok(ReservationView {
            famille: UserService::public_profile(pool, &famille).await?,
            professionnel: UserService::public_profile(pool, &professionnel).await?,
            contact_unlocked: contact.is_some(),
            contact,
            reservation,
        })
    }
}
