//! Client-visible session projection.

use serde::{Deserialize, Serialize};

use crate::token::SessionToken;

/// The session shape exposed to the client.
///
/// Derived deterministically from a [`SessionToken`]; never independently
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The signed-in user.
    pub user: SessionUser,
}

/// User fields inside the client-visible session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Backend record id, once the identity has been resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar image URL.
    pub image: String,
    /// Mobile number.
    pub mobile: String,
    /// Referral code.
    pub referral_code: String,
}

impl From<&SessionToken> for Session {
    fn from(token: &SessionToken) -> Self {
        Self {
            user: SessionUser {
                id: None,
                name: token.name.clone(),
                email: token.email.clone(),
                image: token.avatar.clone(),
                mobile: token.mobile.clone(),
                referral_code: token.referral_code.clone(),
            },
        }
    }
}
