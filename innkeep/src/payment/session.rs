//! Session-based payment provider client.
//!
//! This provider hosts the payment page itself: initiation creates a
//! checkout session and returns a redirect URL for the guest; confirmation
//! re-queries the session by identifier to learn its authoritative status.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::booking::Booking;
use crate::config::ProviderSettings;
use crate::error::{Error, Result};

use super::{InitiateOutcome, ProviderClient, ProviderKind, ProviderPaymentStatus};

/// Request body for creating a checkout session.
#[derive(Debug, Serialize)]
struct CreateSessionRequest<'a> {
    reference: &'a str,
    amount: i64,
}

/// Provider-side representation of a checkout session.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    payment_status: String,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    payment_intent: Option<String>,
    #[serde(default)]
    failure_reason: Option<String>,
}

/// Client for the session-based (hosted page) provider.
#[derive(Debug, Clone)]
pub struct SessionProvider {
    http: Client,
    settings: ProviderSettings,
}

impl SessionProvider {
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
                provider: ProviderKind::Session.as_str().to_string(),
                details: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { http, settings })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    fn unavailable(&self, err: &reqwest::Error) -> Error {
        Error::ProviderUnavailable {
            provider: ProviderKind::Session.as_str().to_string(),
            details: if err.is_timeout() {
                format!("request timed out after {:?}", self.settings.timeout())
            } else {
                err.to_string()
            },
        }
    }
}

impl ProviderClient for SessionProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Session
    }

    fn initiate(&self, booking: &Booking) -> Result<InitiateOutcome> {
        let request = CreateSessionRequest {
            reference: booking.booking_number().as_str(),
            amount: booking.total_price(),
        };

        let response = self
            .http
            .post(self.endpoint("v1/checkout/sessions"))
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .map_err(|e| self.unavailable(&e))?;

        if !response.status().is_success() {
            return Err(Error::ProviderUnavailable {
                provider: ProviderKind::Session.as_str().to_string(),
                details: format!("session creation returned {}", response.status()),
            });
        }

        let session: SessionResponse = response.json().map_err(|e| self.unavailable(&e))?;
        let redirect_url = session.url.ok_or_else(|| Error::ProviderUnavailable {
            provider: ProviderKind::Session.as_str().to_string(),
            details: "session response missing redirect URL".to_string(),
        })?;

        Ok(InitiateOutcome::Redirect {
            session_id: session.id,
            redirect_url,
        })
    }

    fn confirm(&self, reference: &str) -> Result<ProviderPaymentStatus> {
        let response = self
            .http
            .get(self.endpoint(&format!("v1/checkout/sessions/{reference}")))
            .bearer_auth(&self.settings.api_key)
            .send()
            .map_err(|e| self.unavailable(&e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(ProviderPaymentStatus::Unknown);
        }
        if !response.status().is_success() {
            return Err(Error::ProviderUnavailable {
                provider: ProviderKind::Session.as_str().to_string(),
                details: format!("session lookup returned {}", response.status()),
            });
        }

        let session: SessionResponse = response.json().map_err(|e| self.unavailable(&e))?;
        Ok(match session.payment_status.as_str() {
            "paid" => ProviderPaymentStatus::Paid {
                amount: session.amount_total.unwrap_or(0),
                transaction_id: session.payment_intent.unwrap_or(session.id),
            },
            "failed" => ProviderPaymentStatus::Declined {
                reason: session
                    .failure_reason
                    .unwrap_or_else(|| "provider reported failure".to_string()),
            },
            // "unpaid" and anything newer the provider adds
            _ => ProviderPaymentStatus::Pending,
        })
    }
}
