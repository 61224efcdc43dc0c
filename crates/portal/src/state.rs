//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::backend::{BackendClient, BackendError};
use crate::config::PortalConfig;
use crate::identity::provider::ProviderError;
use crate::identity::{CredentialVerifier, ProviderClient, ReferralReporter, SessionEnricher};

/// Error constructing the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("backend client: {0}")]
    Backend(#[from] BackendError),
    #[error("identity provider client: {0}")]
    Provider(#[from] ProviderError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Every service the pipeline needs is
/// constructed here and reached through an accessor - there are no
/// module-level service instances anywhere in the crate.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    pool: PgPool,
    verifier: CredentialVerifier,
    enricher: SessionEnricher,
    referrals: ReferralReporter,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the HTTP clients cannot be constructed.
    pub fn new(config: PortalConfig, pool: PgPool) -> Result<Self, StateError> {
        let provider = ProviderClient::new(&config.identity)?;
        let backend = BackendClient::new(&config.backend)?;

        let verifier = CredentialVerifier::new(&config.identity, provider);
        let enricher = SessionEnricher::new(backend.clone());
        let referrals = ReferralReporter::new(backend);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                verifier,
                enricher,
                referrals,
            }),
        })
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the credential verifier.
    #[must_use]
    pub fn verifier(&self) -> &CredentialVerifier {
        &self.inner.verifier
    }

    /// Get a reference to the session enricher.
    #[must_use]
    pub fn enricher(&self) -> &SessionEnricher {
        &self.inner.enricher
    }

    /// Get a reference to the referral reporter.
    #[must_use]
    pub fn referrals(&self) -> &ReferralReporter {
        &self.inner.referrals
    }
}
