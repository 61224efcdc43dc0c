//! Identity pipeline error taxonomy.
//!
//! Three failure classes with divergent policies:
//!
//! - [`InvalidCredential`] is terminal for a login attempt and is the only
//!   failure that crosses the pipeline boundary.
//! - [`EnrichmentFailure`] is recoverable: call sites log it and keep the
//!   token they already have.
//! - [`ReferralPostFailure`] is recoverable: call sites log it and redirect
//!   anyway.

use thiserror::Error;

use crate::backend::BackendError;

/// The identity provider rejected or could not validate a login assertion.
///
/// Deliberately opaque: expired, malformed, and revoked assertions all
/// collapse into this one value, and the underlying provider detail is only
/// ever logged server-side. The user sees a generic authentication failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid credential")]
pub struct InvalidCredential;

/// A customer-store upsert or resolution failed.
///
/// Never propagates past the enrichment call sites; authentication cannot
/// fail because of it.
#[derive(Debug, Error)]
pub enum EnrichmentFailure {
    /// The customer store request failed or returned a non-2xx status.
    #[error("customer store: {0}")]
    Backend(#[from] BackendError),

    /// Every configured lookup key was tried and none resolved.
    #[error("no lookup key resolved a customer record")]
    Unresolved {
        /// Failure from the last key attempted.
        #[source]
        last: BackendError,
    },
}

/// The referral completion POST failed.
///
/// Logged only; the callback redirect does not depend on it.
#[derive(Debug, Error)]
pub enum ReferralPostFailure {
    /// The referral endpoint request failed or returned a non-2xx status.
    #[error("referral endpoint: {0}")]
    Backend(#[from] BackendError),

    /// The posting task was cancelled or panicked before completing.
    #[error("referral task did not complete: {0}")]
    Task(String),

    /// The bounded wait for the posting task elapsed; the task itself keeps
    /// running detached.
    #[error("timed out waiting for referral completion")]
    Timeout,
}
