//! Credential verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::Deserialize;

use haven_core::IdentityClaims;

use crate::config::IdentityProviderConfig;
use crate::identity::error::InvalidCredential;
use crate::identity::provider::ProviderClient;

/// Claims carried inside a login assertion.
///
/// Standard OIDC names; `exp`, `iss`, and `aud` are enforced by the decoder
/// and not needed here.
#[derive(Debug, Deserialize)]
struct AssertionClaims {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    phone_number: Option<String>,
}

/// Validates login assertions against the identity provider's trust root.
///
/// Both federated channels (OAuth and phone one-time-code) end in the
/// provider issuing a signed assertion; this is the single entry point that
/// turns one into [`IdentityClaims`]. It is also the only pipeline stage
/// whose failure is allowed to fail a login.
pub struct CredentialVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    provider: ProviderClient,
}

impl CredentialVerifier {
    /// Create a verifier for the configured provider.
    #[must_use]
    pub fn new(config: &IdentityProviderConfig, provider: ProviderClient) -> Self {
        let decoding_key =
            DecodingKey::from_secret(config.assertion_secret.expose_secret().as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Self {
            decoding_key,
            validation,
            provider,
        }
    }

    /// Verify a raw assertion and extract canonical claims.
    ///
    /// Checks signature, expiry, issuer, and audience, then performs the
    /// secondary canonical-profile lookup by subject id so channels that
    /// omit fields (a phone login has no email, an OAuth login no phone)
    /// still produce the fullest claim set the provider knows.
    ///
    /// # Errors
    ///
    /// Returns the opaque [`InvalidCredential`] for every failure mode -
    /// expired, tampered, wrong issuer or audience, revoked subject, profile
    /// endpoint errors. The underlying detail is logged, never returned.
    pub async fn verify(&self, assertion: &str) -> Result<IdentityClaims, InvalidCredential> {
        let token = jsonwebtoken::decode::<AssertionClaims>(
            assertion,
            &self.decoding_key,
            &self.validation,
        )
        .map_err(|e| {
            tracing::warn!(error = %e, "login assertion failed validation");
            InvalidCredential
        })?;

        let asserted = token.claims;

        let profile = self
            .provider
            .profile(&asserted.sub)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "canonical profile lookup failed");
                InvalidCredential
            })?;

        // The profile is the fuller source; the assertion fills any gaps.
        Ok(IdentityClaims {
            subject_id: asserted.sub,
            email: profile.email.or(asserted.email),
            phone_number: profile.phone_number.or(asserted.phone_number),
            display_name: profile.display_name.or(asserted.name),
            photo_url: profile.photo_url.or(asserted.picture),
        })
    }
}
