// src/models/reservation.rs
// DOCUMENTATION: Reservation records and their lifecycle
// PURPOSE: Status enum with the transition table, DTOs and the gated view

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

use super::{ContactInfo, PublicProfile, Role};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ReservationStatus {
    EnAttente,
    Acceptee,
    Refusee,
    Payee,
    Terminee,
    Annulee,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 6] = [
        ReservationStatus::EnAttente,
        ReservationStatus::Acceptee,
        ReservationStatus::Refusee,
        ReservationStatus::Payee,
        ReservationStatus::Terminee,
        ReservationStatus::Annulee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::EnAttente => "en_attente",
            ReservationStatus::Acceptee => "acceptee",
            ReservationStatus::Refusee => "refusee",
            ReservationStatus::Payee => "payee",
            ReservationStatus::Terminee => "terminee",
            ReservationStatus::Annulee => "annulee",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReservationStatus::Refusee | ReservationStatus::Terminee | ReservationStatus::Annulee
        )
    }

    /// Contact details are released once the famille has paid
    pub fn unlocks_contact(&self) -> bool {
        matches!(self, ReservationStatus::Payee | ReservationStatus::Terminee)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who is asking for a status change, relative to the reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Famille,
    Professionnel,
    Admin,
    /// Payment confirmation, never a user request
    PaymentSystem,
}

/// Transition table of the reservation lifecycle.
/// `service_ended` tells whether the last reserved day is today or in the past.
pub fn transition_allowed(
    from: ReservationStatus,
    to: ReservationStatus,
    actor: Actor,
    service_ended: bool,
) -> bool {
    use ReservationStatus::*;

    match (from, to) {
        (EnAttente, Acceptee) | (EnAttente, Refusee) => actor == Actor::Professionnel,
        (EnAttente, Annulee) => matches!(actor, Actor::Famille | Actor::Admin),
        (Acceptee, Payee) => actor == Actor::PaymentSystem,
        (Acceptee, Annulee) => matches!(
            actor,
            Actor::Famille | Actor::Professionnel | Actor::Admin
        ),
        (Payee, Terminee) => match actor {
            Actor::Admin => true,
            Actor::Professionnel => service_ended,
            _ => false,
        },
        (Payee, Annulee) => actor == Actor::Admin,
        _ => false,
    }
}

/// Reservation row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub famille_id: i64,
    pub professionnel_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub hours_per_day: f64,
    pub hourly_rate: f64,
    pub total_price: f64,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_participant(&self, user_id: i64) -> bool {
        self.famille_id == user_id || self.professionnel_id == user_id
    }

    /// Map a user onto their role in this reservation
    pub fn actor_for(&self, user_id: i64, role: Role) -> Option<Actor> {
        if role == Role::Admin {
            Some(Actor::Admin)
        } else if self.famille_id == user_id {
            Some(Actor::Famille)
        } else if self.professionnel_id == user_id {
            Some(Actor::Professionnel)
        } else {
            None
        }
    }

    pub fn counterpart_of(&self, user_id: i64) -> i64 {
        if self.famille_id == user_id {
            self.professionnel_id
        } else {
            self.famille_id
        }
    }
}

/// Price request shared by quote and creation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteRequest {
    pub professionnel_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// HH:MM
    #[validate(length(equal = 5))]
    pub start_time: String,
    /// HH:MM
    #[validate(length(equal = 5))]
    pub end_time: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReservationRequest {
    #[serde(flatten)]
    #[validate]
    pub slot: QuoteRequest,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateReservationStatusRequest {
    pub status: ReservationStatus,

    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReservationQuery {
    pub status: Option<ReservationStatus>,
}

/// One reserved day in a quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceLine {
    pub date: NaiveDate,
    pub hours: f64,
    pub amount: f64,
}

/// Day-by-day price breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceQuote {
    pub professionnel_id: i64,
    pub hourly_rate: f64,
    pub hours_per_day: f64,
    pub days: Vec<PriceLine>,
    pub total_price: f64,
}

/// Reservation as seen by one of its participants (or an admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationView {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub famille: PublicProfile,
    pub professionnel: PublicProfile,
    pub contact_unlocked: bool,
    /// Counterpart contact (both contacts for admins), null until unlocked
    pub contact: Option<ReservationContacts>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationContacts {
    pub famille: Option<ContactInfo>,
    pub professionnel: Option<ContactInfo>,
}
