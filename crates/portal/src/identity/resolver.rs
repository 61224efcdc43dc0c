//! Canonical identity resolution.

use haven_core::{CustomerRecord, SessionToken};

use crate::backend::BackendClient;
use crate::identity::error::EnrichmentFailure;

/// Which token field a lookup attempt keys on.
///
/// OAuth and phone logins each populate only one of these; trying them in
/// order is what eventually converges both login channels onto one customer
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    /// Key by the token's mobile number (preferred).
    Mobile,
    /// Key by the token's email address.
    Email,
}

impl LookupKey {
    /// The token field this key reads.
    #[must_use]
    pub fn value_of<'t>(self, token: &'t SessionToken) -> &'t str {
        match self {
            Self::Mobile => &token.mobile,
            Self::Email => &token.email,
        }
    }
}

/// Resolution order: mobile first, email as the single fallback.
///
/// The policy is this list, not control flow; there is deliberately no retry
/// and no third key.
pub const LOOKUP_ORDER: [LookupKey; 2] = [LookupKey::Mobile, LookupKey::Email];

/// Looks up the authoritative customer record for a session token.
pub struct CustomerResolver {
    backend: BackendClient,
    order: &'static [LookupKey],
}

impl CustomerResolver {
    /// Create a resolver using the default [`LOOKUP_ORDER`].
    #[must_use]
    pub const fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            order: &LOOKUP_ORDER,
        }
    }

    /// Create a resolver with an explicit strategy order (tests).
    #[must_use]
    pub const fn with_order(backend: BackendClient, order: &'static [LookupKey]) -> Self {
        Self { backend, order }
    }

    /// Resolve the canonical record, trying each key in order and stopping
    /// at the first success.
    ///
    /// Empty key values are still attempted - the store answers them with a
    /// miss, which simply moves resolution on to the next key.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentFailure::Unresolved`] carrying the last lookup's
    /// failure once every key has been tried.
    pub async fn resolve(&self, token: &SessionToken) -> Result<CustomerRecord, EnrichmentFailure> {
        let mut last_error = None;

        for key in self.order {
            match self.backend.fetch_customer(key.value_of(token)).await {
                Ok(record) => return Ok(record),
                Err(e) => {
                    tracing::debug!(key = ?key, error = %e, "customer lookup missed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(last) => Err(EnrichmentFailure::Unresolved { last }),
            // Unreachable with a non-empty order; kept total for safety.
            None => Err(EnrichmentFailure::Unresolved {
                last: crate::backend::BackendError::Config("no lookup keys configured".into()),
            }),
        }
    }
}
