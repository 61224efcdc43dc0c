//! Haven backend API client.
//!
//! The backend is the system of record for customers and referral credits.
//! The portal talks to it over a small REST surface:
//!
//! - `POST /customer` - create-or-update a customer profile
//! - `GET /customer/{identifier}` - look up a customer by mobile or email
//! - `POST /referrals` - record a completed referral
//!
//! Listing and other content endpoints live on the same API but are consumed
//! by the rendering tier, not by this client.

mod types;

pub use types::CustomerUpsert;

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use haven_core::{CustomerRecord, ReferralEvent};

use crate::config::BackendApiConfig;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// A 2xx response body did not parse as the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The client itself could not be constructed.
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Client for the Haven backend customer and referral endpoints.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend API client.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the HTTP client fails to build.
    pub fn new(config: &BackendApiConfig) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| BackendError::Config(format!("invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Create-or-update a customer profile.
    ///
    /// Any 2xx status counts as success; the response body is not inspected.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx status.
    pub async fn upsert_customer(&self, upsert: &CustomerUpsert) -> Result<(), BackendError> {
        let url = format!("{}/customer", self.inner.base_url);

        let response = self.inner.client.post(&url).json(upsert).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Look up the canonical customer record by mobile number or email.
    ///
    /// The identifier is URL-encoded verbatim; an empty string is a legal
    /// (if never-matching) key and simply comes back as a lookup failure.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, a non-2xx status, or an
    /// unparseable body.
    pub async fn fetch_customer(&self, identifier: &str) -> Result<CustomerRecord, BackendError> {
        let url = format!(
            "{}/customer/{}",
            self.inner.base_url,
            urlencoding::encode(identifier)
        );

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CustomerRecord>()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Record a completed referral.
    ///
    /// The response body is not inspected beyond the status class.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx status.
    pub async fn submit_referral(&self, event: &ReferralEvent) -> Result<(), BackendError> {
        let url = format!("{}/referrals", self.inner.base_url);

        let response = self.inner.client.post(&url).json(event).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
