//! Identity resolution & session enrichment pipeline.
//!
//! The flow that turns a federated login (OAuth or phone one-time-code) into
//! a durable session carrying a canonical customer identity, and keeps that
//! identity synchronized against the backend customer store:
//!
//! 1. [`verifier::CredentialVerifier`] validates the login assertion and
//!    extracts canonical claims. The only stage that can fail a login.
//! 2. [`enricher::SessionEnricher`] upserts the customer at login and, on
//!    every refresh, re-resolves the canonical record via
//!    [`resolver::CustomerResolver`] (mobile first, email fallback),
//!    overwriting the token's backend-authoritative fields.
//! 3. [`projector::project`] maps the token to the client-visible session.
//! 4. [`referral::ReferralReporter`] posts best-effort referral completion
//!    events from the post-login callback.
//!
//! Failure policies diverge on purpose: verification failures are terminal
//! and opaque, enrichment and referral failures are logged and absorbed at
//! their call sites.

pub mod enricher;
pub mod error;
pub mod projector;
pub mod provider;
pub mod referral;
pub mod resolver;
pub mod verifier;

pub use enricher::SessionEnricher;
pub use error::{EnrichmentFailure, InvalidCredential, ReferralPostFailure};
pub use projector::project;
pub use provider::ProviderClient;
pub use referral::{ReferralReporter, ReferralSubmission};
pub use resolver::{CustomerResolver, LookupKey};
pub use verifier::CredentialVerifier;
