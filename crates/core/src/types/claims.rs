//! Identity-provider claims.

use serde::{Deserialize, Serialize};

/// Canonical claims extracted from a verified login assertion.
///
/// Produced once per login event by the credential verifier and folded into
/// the [`SessionToken`](crate::SessionToken); not stored anywhere else.
///
/// Which optional fields are present depends on the login channel: an OAuth
/// login carries an email but usually no phone number, a phone one-time-code
/// login carries a phone number but usually no email. The provider's
/// canonical-profile endpoint fills in whatever the assertion itself omits,
/// so a claim set may still be partial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaims {
    /// Provider-assigned stable subject identifier.
    pub subject_id: String,
    /// Email address, if the login channel supplied one.
    pub email: Option<String>,
    /// Phone number in the provider's canonical form.
    pub phone_number: Option<String>,
    /// Display name chosen at the provider.
    pub display_name: Option<String>,
    /// Profile photo URL.
    pub photo_url: Option<String>,
}

impl IdentityClaims {
    /// Create a claim set carrying only a subject id.
    #[must_use]
    pub fn bare(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            email: None,
            phone_number: None,
            display_name: None,
            photo_url: None,
        }
    }
}
