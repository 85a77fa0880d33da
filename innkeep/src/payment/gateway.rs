//! The closed set of payment providers.
//!
//! [`PaymentGateway`] is a tagged enum over exactly the two supported
//! provider variants. Call sites never branch on provider-specific payload
//! shapes; they pick a variant here and work through the shared
//! [`ProviderClient`] interface.

use crate::config::ProvidersConfig;
use crate::error::{Error, Result};

use super::{ChargeProvider, ProviderClient, ProviderKind, SessionProvider};

/// A configured payment provider, one of the two supported variants.
#[derive(Debug)]
pub enum PaymentGateway {
    /// Hosted-page provider.
    Session(SessionProvider),
    /// Client-widget provider.
    Charge(ChargeProvider),
}

impl PaymentGateway {
    /// Builds the gateway for the requested provider variant from
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the requested provider is not
    /// configured, or a provider error if its HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use innkeep::config::{ProviderSettings, ProvidersConfig};
    /// use innkeep::payment::{PaymentGateway, ProviderKind};
    ///
    /// let providers = ProvidersConfig {
    ///     session: Some(ProviderSettings {
    ///         base_url: "https://pay.example".to_string(),
    ///         api_key: "sk_test".to_string(),
    ///         timeout_seconds: None,
    ///     }),
    ///     charge: None,
    /// };
    ///
    /// assert!(PaymentGateway::from_config(&providers, ProviderKind::Session).is_ok());
    /// assert!(PaymentGateway::from_config(&providers, ProviderKind::Charge).is_err());
    /// ```
    pub fn from_config(providers: &ProvidersConfig, kind: ProviderKind) -> Result<Self> {
        match kind {
            ProviderKind::Session => {
                let settings = providers.session.clone().ok_or_else(|| Error::Validation {
                    field: "providers.session".into(),
                    message: "session provider is not configured".into(),
                })?;
                Ok(Self::Session(SessionProvider::new(settings)?))
            }
            ProviderKind::Charge => {
                let settings = providers.charge.clone().ok_or_else(|| Error::Validation {
                    field: "providers.charge".into(),
                    message: "charge provider is not configured".into(),
                })?;
                Ok(Self::Charge(ChargeProvider::new(settings)?))
            }
        }
    }

    /// Returns the underlying provider client.
    #[must_use]
    pub fn client(&self) -> &dyn ProviderClient {
        match self {
            Self::Session(provider) => provider,
            Self::Charge(provider) => provider,
        }
    }

    /// Returns which provider variant this gateway talks to.
    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.client().kind()
    }
}
