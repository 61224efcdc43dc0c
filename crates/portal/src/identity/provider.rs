//! Identity provider profile client.
//!
//! Login assertions carry only the claims the channel happened to collect,
//! so the verifier follows up with the provider's account-profile endpoint
//! to obtain the full canonical claim set for a subject.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use haven_core::IdentityClaims;

use crate::config::IdentityProviderConfig;

/// Errors that can occur when calling the identity provider.
///
/// Internal to the pipeline; the verifier collapses all of these into the
/// opaque `InvalidCredential` before anything crosses the boundary.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// A 2xx response body did not parse as a profile.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The client itself could not be constructed.
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Client for the identity provider's account-profile API.
#[derive(Clone)]
pub struct ProviderClient {
    inner: Arc<ProviderClientInner>,
}

struct ProviderClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ProviderClient {
    /// Create a new profile API client.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Config`] if the HTTP client fails to build.
    pub fn new(config: &IdentityProviderConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| ProviderError::Config(format!("invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(ProviderClientInner {
                client,
                base_url: config.profile_url.clone(),
            }),
        })
    }

    /// Fetch the canonical profile for a subject id.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on transport failure, a non-2xx status, or an
    /// unparseable body.
    pub async fn profile(&self, subject_id: &str) -> Result<IdentityClaims, ProviderError> {
        let url = format!(
            "{}/accounts/{}",
            self.inner.base_url,
            urlencoding::encode(subject_id)
        );

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<IdentityClaims>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}
