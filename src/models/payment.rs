// src/models/payment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaymentStatus {
    EnAttente,
    Reussi,
    Echoue,
    Rembourse,
}

/// Payment attached to a reservation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub reservation_id: i64,
    pub famille_id: i64,
    pub amount: f64,
    pub currency: String,
    pub provider_payment_id: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Amount in the currency's minor unit (cents)
    pub fn amount_minor(&self) -> i64 {
        to_minor_units(self.amount)
    }
}

pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePaymentIntentRequest {
    pub reservation_id: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConfirmPaymentRequest {
    #[validate(length(min = 1, max = 255))]
    pub payment_intent_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentIntentResponse {
    pub payment: Payment,
    pub client_secret: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentQuery {
    pub status: Option<PaymentStatus>,
}
