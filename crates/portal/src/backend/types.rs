//! Wire types for the backend API.

use serde::{Deserialize, Serialize};

use haven_core::SessionToken;

/// Body of `POST /customer`.
///
/// Sent once per login event with whatever the identity provider supplied;
/// the backend merges it into the canonical record on its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerUpsert {
    /// Display name.
    pub name: String,
    /// Email address, `""` for phone-only logins.
    pub email: String,
    /// Mobile number, `""` for OAuth logins.
    pub mobile: String,
    /// Avatar image URL.
    pub avatar: String,
}

impl From<&SessionToken> for CustomerUpsert {
    fn from(token: &SessionToken) -> Self {
        Self {
            name: token.name.clone(),
            email: token.email.clone(),
            mobile: token.mobile.clone(),
            avatar: token.avatar.clone(),
        }
    }
}
