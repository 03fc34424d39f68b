// src/services/payment_provider.rs
// DOCUMENTATION: Stripe API client and the simulated fallback
// PURPOSE: Handle communication with Stripe PaymentIntents and Refunds

use crate::config::Config;
use crate::errors::DomicareError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Stripe REST client
/// DOCUMENTATION: Form-encoded requests authenticated with the secret key
pub struct StripeClient {
    /// HTTP client for making requests
    client: Client,
    /// Stripe secret key (sk_...)
    secret_key: String,
    /// Base URL for the Stripe API
    base_url: String,
}

/// PaymentIntent as returned by Stripe (fields we use)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    /// requires_payment_method, requires_confirmation, requires_action,
    /// processing, requires_capture, canceled, succeeded
    pub status: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeRefund {
    id: String,
    status: Option<String>,
}

impl StripeClient {
    pub fn new(secret_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            secret_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a PaymentIntent for a reservation
    /// DOCUMENTATION: `amount` is in the currency's minor unit
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        reservation_id: i64,
    ) -> Result<StripePaymentIntent, DomicareError> {
        let url = format!("{}/payment_intents", self.base_url);
        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("metadata[reservation_id]", reservation_id.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        log::debug!(
            "Stripe create payment intent: reservation={}, amount={} {}",
            reservation_id,
            amount,
            currency
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Stripe request failed: {}", e);
                DomicareError::PaymentError(format!("Request failed: {}", e))
            })?;

        Self::parse_response(response).await
    }

    /// Fetch the current state of a PaymentIntent
    pub async fn retrieve_payment_intent(
        &self,
        id: &str,
    ) -> Result<StripePaymentIntent, DomicareError> {
        let url = format!("{}/payment_intents/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| {
                log::error!("Stripe request failed: {}", e);
                DomicareError::PaymentError(format!("Request failed: {}", e))
            })?;

        Self::parse_response(response).await
    }

    /// Refund the full amount of a PaymentIntent
    pub async fn refund(&self, payment_intent_id: &str) -> Result<(), DomicareError> {
        let url = format!("{}/refunds", self.base_url);
        let params = [("payment_intent", payment_intent_id)];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                log::error!("Stripe refund request failed: {}", e);
                DomicareError::PaymentError(format!("Request failed: {}", e))
            })?;

        let refund: StripeRefund = Self::parse_response(response).await?;
        log::info!(
            "Stripe refund {} for {}: {}",
            refund.id,
            payment_intent_id,
            refund.status.as_deref().unwrap_or("unknown")
        );
        Ok(())
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DomicareError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .ok()
                .map(|e| {
                    format!(
                        "{}: {}",
                        e.error.kind.unwrap_or_else(|| "api_error".to_string()),
                        e.error.message.unwrap_or_default()
                    )
                })
                .unwrap_or(body);
            log::error!("Stripe API error {}: {}", status, message);
            return Err(DomicareError::PaymentError(format!(
                "API error {}: {}",
                status, message
            )));
        }

        response.json::<T>().await.map_err(|e| {
            log::error!("Failed to parse Stripe response: {}", e);
            DomicareError::PaymentError(format!("Parse error: {}", e))
        })
    }
}

/// Outcome of a payment intent, provider-independent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentOutcome {
    Succeeded,
    Failed,
    Pending,
}

impl IntentOutcome {
    pub fn from_stripe_status(status: &str) -> Self {
        match status {
            "succeeded" => IntentOutcome::Succeeded,
            "canceled" | "requires_payment_method" => IntentOutcome::Failed,
            _ => IntentOutcome::Pending,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderIntent {
    pub id: String,
    pub client_secret: String,
    pub outcome: IntentOutcome,
}

const SIMULATED_PREFIX: &str = "pi_sim_";

/// Payment backend selected from configuration
/// DOCUMENTATION: Stripe when STRIPE_SECRET_KEY is set, otherwise every
/// intent is simulated and succeeds
pub enum PaymentProvider {
    Stripe(StripeClient),
    Simulated,
}

impl PaymentProvider {
    pub fn from_config(config: &Config) -> Self {
        if config.stripe_enabled() {
            PaymentProvider::Stripe(StripeClient::new(
                config.stripe_secret_key.clone(),
                config.stripe_api_base.clone(),
            ))
        } else {
            PaymentProvider::Simulated
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaymentProvider::Stripe(_) => "stripe",
            PaymentProvider::Simulated => "simulated",
        }
    }

    pub async fn create_intent(
        &self,
        amount: i64,
        currency: &str,
        reservation_id: i64,
    ) -> Result<ProviderIntent, DomicareError> {
        match self {
            PaymentProvider::Stripe(client) => {
                let intent = client
                    .create_payment_intent(amount, currency, reservation_id)
                    .await?;
                let client_secret = intent.client_secret.clone().ok_or_else(|| {
                    DomicareError::PaymentError("PaymentIntent without client_secret".to_string())
                })?;
                Ok(ProviderIntent {
                    outcome: IntentOutcome::from_stripe_status(&intent.status),
                    id: intent.id,
                    client_secret,
                })
            }
            PaymentProvider::Simulated => {
                let id = format!("{}{}", SIMULATED_PREFIX, uuid::Uuid::new_v4().simple());
                log::info!(
                    "Simulated payment intent {} for reservation {} ({} {})",
                    id,
                    reservation_id,
                    amount,
                    currency
                );
                Ok(ProviderIntent {
                    client_secret: format!("{}_secret", id),
                    id,
                    outcome: IntentOutcome::Pending,
                })
            }
        }
    }

    pub async fn retrieve_intent(&self, id: &str) -> Result<ProviderIntent, DomicareError> {
        match self {
            PaymentProvider::Stripe(client) => {
                let intent = client.retrieve_payment_intent(id).await?;
                Ok(ProviderIntent {
                    outcome: IntentOutcome::from_stripe_status(&intent.status),
                    client_secret: intent.client_secret.unwrap_or_default(),
                    id: intent.id,
                })
            }
            PaymentProvider::Simulated => {
                if !id.starts_with(SIMULATED_PREFIX) {
                    return Err(DomicareError::PaymentError(format!(
                        "Unknown payment intent {}",
                        id
                    )));
                }
                Ok(ProviderIntent {
                    id: id.to_string(),
                    client_secret: format!("{}_secret", id),
                    outcome: IntentOutcome::Succeeded,
                })
            }
        }
    }

    pub async fn refund(&self, payment_intent_id: &str) -> Result<(), DomicareError> {
        match self {
            PaymentProvider::Stripe(client) => client.refund(payment_intent_id).await,
            PaymentProvider::Simulated => {
                log::info!("Simulated refund for {}", payment_intent_id);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_status_mapping() {
        assert_eq!(
            IntentOutcome::from_stripe_status("succeeded"),
            IntentOutcome::Succeeded
        );
        assert_eq!(
            IntentOutcome::from_stripe_status("canceled"),
            IntentOutcome::Failed
        );
        assert_eq!(
            IntentOutcome::from_stripe_status("requires_payment_method"),
            IntentOutcome::Failed
        );
        assert_eq!(
            IntentOutcome::from_stripe_status("processing"),
            IntentOutcome::Pending
        );
    }

    #[test]
    fn test_provider_selection() {
        let mut config = Config::for_tests();
        assert_eq!(PaymentProvider::from_config(&config).name(), "simulated");

        config.stripe_secret_key = "sk_test_123".to_string();
        assert_eq!(PaymentProvider::from_config(&config).name(), "stripe");
    }

    #[tokio::test]
    async fn test_simulated_intent_lifecycle() {
        let provider = PaymentProvider::Simulated;
        let intent = provider.create_intent(18000, "eur", 4).await.unwrap();

        assert!(intent.id.starts_with(SIMULATED_PREFIX));
        assert_eq!(intent.outcome, IntentOutcome::Pending);
        assert!(intent.client_secret.starts_with(&intent.id));

        let fetched = provider.retrieve_intent(&intent.id).await.unwrap();
        assert_eq!(fetched.outcome, IntentOutcome::Succeeded);

        tokio_test::assert_err!(provider.retrieve_intent("pi_real_123").await);
        tokio_test::assert_ok!(provider.refund(&intent.id).await);
    }
}
