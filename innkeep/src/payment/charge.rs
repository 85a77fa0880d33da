//! Charge-based payment provider client.
//!
//! This provider collects card details in a client-side widget: initiation
//! registers the pending charge and returns the token the widget needs;
//! confirmation re-queries the charge by identifier. The charge identifier
//! arriving back from the client is untrusted until that re-query succeeds.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::booking::Booking;
use crate::config::ProviderSettings;
use crate::error::{Error, Result};

use super::{InitiateOutcome, ProviderClient, ProviderKind, ProviderPaymentStatus};

/// Request body for registering a pending charge.
#[derive(Debug, Serialize)]
struct CreateChargeRequest<'a> {
    reference: &'a str,
    amount: i64,
}

/// Response from registering a pending charge.
#[derive(Debug, Deserialize)]
struct CreateChargeResponse {
    charge_id: String,
    client_token: String,
}

/// Provider-side representation of a charge.
#[derive(Debug, Deserialize)]
struct ChargeResponse {
    id: String,
    status: String,
    #[serde(default)]
    amount: Option<i64>,
    #[serde(default)]
    failure_message: Option<String>,
}

/// Client for the charge-based (client widget) provider.
#[derive(Debug, Clone)]
pub struct ChargeProvider {
    http: Client,
    settings: ProviderSettings,
}

impl ChargeProvider {
    /// Builds a client from provider settings, applying the configured
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| Error::ProviderUnavailable {
                provider: ProviderKind::Charge.as_str().to_string(),
                details: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http, settings })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn unavailable(&self, err: &reqwest::Error) -> Error {
        Error::ProviderUnavailable {
            provider: ProviderKind::Charge.as_str().to_string(),
            details: if err.is_timeout() {
                format!("request timed out after {:?}", self.settings.timeout())
            } else {
                err.to_string()
            },
        }
    }
}

impl ProviderClient for ChargeProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Charge
    }

    fn initiate(&self, booking: &Booking) -> Result<InitiateOutcome> {
        let request = CreateChargeRequest {
            reference: booking.booking_number().as_str(),
            amount: booking.total_price(),
        };

        let response = self
            .http
            .post(self.endpoint("v1/charges"))
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .map_err(|e| self.unavailable(&e))?;

        if !response.status().is_success() {
            return Err(Error::ProviderUnavailable {
                provider: ProviderKind::Charge.as_str().to_string(),
                details: format!("charge registration returned {}", response.status()),
            });
        }

        let created: CreateChargeResponse = response.json().map_err(|e| self.unavailable(&e))?;
        Ok(InitiateOutcome::ClientCharge {
            charge_id: created.charge_id,
            client_token: created.client_token,
        })
    }

    fn confirm(&self, reference: &str) -> Result<ProviderPaymentStatus> {
        let response = self
            .http
            .get(self.endpoint(&format!("v1/charges/{reference}")))
            .bearer_auth(&self.settings.api_key)
            .send()
            .map_err(|e| self.unavailable(&e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ProviderPaymentStatus::Unknown);
        }
        if !response.status().is_success() {
            return Err(Error::ProviderUnavailable {
                provider: ProviderKind::Charge.as_str().to_string(),
                details: format!("charge lookup returned {}", response.status()),
            });
        }

        let charge: ChargeResponse = response.json().map_err(|e| self.unavailable(&e))?;
        Ok(match charge.status.as_str() {
            "succeeded" => ProviderPaymentStatus::Paid {
                amount: charge.amount.unwrap_or(0),
                transaction_id: charge.id,
            },
            "failed" => ProviderPaymentStatus::Declined {
                reason: charge
                    .failure_message
                    .unwrap_or_else(|| "provider reported failure".to_string()),
            },
            _ => ProviderPaymentStatus::Pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ProviderSettings {
        ProviderSettings {
            base_url: "https://charge.example".to_string(),
            api_key: "ck_test".to_string(),
            timeout_seconds: Some(1),
        }
    }

    #[test]
    fn test_kind() {
        let provider = ChargeProvider::new(settings()).unwrap();
        assert_eq!(provider.kind(), ProviderKind::Charge);
    }

    #[test]
    fn test_charge_response_parsing() {
        let json = r#"{"id": "ch_123", "status": "succeeded", "amount": 20000}"#;
        let charge: ChargeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(charge.id, "ch_123");
        assert_eq!(charge.status, "succeeded");
        assert_eq!(charge.amount, Some(20000));
    }

    #[test]
    fn test_charge_response_failure_message() {
        let json = r#"{"id": "ch_123", "status": "failed", "failure_message": "card declined"}"#;
        let charge: ChargeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(charge.failure_message.as_deref(), Some("card declined"));
    }

    #[test]
    fn test_create_charge_response_parsing() {
        let json = r#"{"charge_id": "ch_123", "client_token": "tok_456"}"#;
        let created: CreateChargeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(created.charge_id, "ch_123");
        assert_eq!(created.client_token, "tok_456");
    }
}
