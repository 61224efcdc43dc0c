//! Server-held session token.

use serde::{Deserialize, Serialize};

use crate::claims::IdentityClaims;
use crate::customer::CustomerRecord;

/// The server-held, session-scoped identity record.
///
/// Created at login from provider-supplied claims and overwritten on every
/// refresh with whatever the backend store resolves — backend data always
/// wins over provider data. The session layer owns storage; the enrichment
/// pipeline only reads a token and returns a modified copy.
///
/// Fields are plain strings, empty when unknown. An empty `mobile` is still a
/// legal lookup key: an OAuth login starts with no mobile at all and only
/// converges on one once the backend resolves the customer by email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    /// Mobile number, or `""` until resolved.
    pub mobile: String,
    /// Display name.
    pub name: String,
    /// Email address, or `""` for phone-only logins.
    pub email: String,
    /// Referral code owned by this customer. The backend store, not the
    /// identity provider, is the source of truth for this field.
    pub referral_code: String,
    /// Avatar image URL.
    pub avatar: String,
}

impl SessionToken {
    /// Build the initial token from freshly verified provider claims.
    ///
    /// Absent claims become empty strings; the first refresh against the
    /// backend store replaces them with canonical values where it can.
    #[must_use]
    pub fn from_claims(claims: &IdentityClaims) -> Self {
        Self {
            mobile: claims.phone_number.clone().unwrap_or_default(),
            name: claims.display_name.clone().unwrap_or_default(),
            email: claims.email.clone().unwrap_or_default(),
            referral_code: String::new(),
            avatar: claims.photo_url.clone().unwrap_or_default(),
        }
    }

    /// Overwrite the backend-authoritative fields from a resolved record.
    ///
    /// `mobile`, `name`, `email`, and `referral_code` take the store's
    /// values; the avatar stays as the provider supplied it.
    pub fn apply_record(&mut self, record: &CustomerRecord) {
        self.mobile = record.mobile.clone();
        self.name = record.name.clone();
        self.email = record.email.clone();
        self.referral_code = record.referral_code.clone();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record() -> CustomerRecord {
        CustomerRecord {
            id: "c-1".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            mobile: "+15550100".to_string(),
            avatar: "https://img.example.com/store.png".to_string(),
            referral_code: "R1".to_string(),
        }
    }

    #[test]
    fn test_from_claims_fills_known_channels() {
        let claims = IdentityClaims {
            subject_id: "sub-1".to_string(),
            email: Some("ada@example.com".to_string()),
            phone_number: None,
            display_name: Some("Ada".to_string()),
            photo_url: Some("https://img.example.com/p.png".to_string()),
        };

        let token = SessionToken::from_claims(&claims);
        assert_eq!(token.email, "ada@example.com");
        assert_eq!(token.mobile, "");
        assert_eq!(token.name, "Ada");
        assert_eq!(token.referral_code, "");
    }

    #[test]
    fn test_apply_record_overwrites_backend_fields() {
        let mut token = SessionToken {
            mobile: String::new(),
            name: "Ada".to_string(),
            email: "old@example.com".to_string(),
            referral_code: String::new(),
            avatar: "https://img.example.com/provider.png".to_string(),
        };

        token.apply_record(&record());

        assert_eq!(token.mobile, "+15550100");
        assert_eq!(token.name, "Ada Lovelace");
        assert_eq!(token.email, "ada@example.com");
        assert_eq!(token.referral_code, "R1");
        // Avatar is not backend-authoritative.
        assert_eq!(token.avatar, "https://img.example.com/provider.png");
    }

    #[test]
    fn test_session_roundtrip() {
        let token = SessionToken {
            mobile: "+15550100".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            referral_code: "R1".to_string(),
            avatar: String::new(),
        };

        let json = serde_json::to_string(&token).unwrap();
        let back: SessionToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
