//! Session-related types.
//!
//! Wire types for the sign-in API and the keys under which authentication
//! state lives in the session store. The token itself is
//! [`haven_core::SessionToken`]; the session layer owns its persistence and
//! the pipeline only ever reads and writes copies.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    /// The signed assertion issued by the identity provider after either
    /// federated channel completes.
    pub assertion: String,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the server-held identity token.
    pub const IDENTITY_TOKEN: &str = "identity_token";
}
