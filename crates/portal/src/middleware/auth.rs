//! Authentication extractors.
//!
//! `CurrentCustomer` is the session-refresh seam: extracting it re-runs the
//! enricher's resolution step, so every authenticated page or API request
//! observes backend-synchronized identity. If that trigger condition ever
//! changes (say, to login-only resolution), this extractor is the single
//! place to change it.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use haven_core::SessionToken;

use crate::models::session_keys;
use crate::state::AppState;

/// Extractor that requires an authenticated customer.
///
/// Loads the identity token from the session, refreshes it against the
/// customer store (failures logged, stale token kept), persists the result,
/// and hands the token to the handler.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     CurrentCustomer(token): CurrentCustomer,
/// ) -> impl IntoResponse {
///     format!("hello {}", token.name)
/// }
/// ```
pub struct CurrentCustomer(pub SessionToken);

/// Error returned when authentication is required but not present.
pub enum CustomerRejection {
    /// Redirect to the login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for CustomerRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for CurrentCustomer {
    type Rejection = CustomerRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Session is set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(CustomerRejection::Unauthorized)?
            .clone();

        let token: SessionToken = session
            .get(session_keys::IDENTITY_TOKEN)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if parts.uri.path().starts_with("/api/") {
                    CustomerRejection::Unauthorized
                } else {
                    CustomerRejection::RedirectToLogin
                }
            })?;

        // Re-resolve on every request; the backend is the source of truth.
        let token = match state.enricher().refresh(&token).await {
            Ok(refreshed) => {
                if let Err(e) = session
                    .insert(session_keys::IDENTITY_TOKEN, &refreshed)
                    .await
                {
                    tracing::warn!(error = %e, "failed to persist refreshed identity token");
                }
                refreshed
            }
            Err(e) => {
                tracing::warn!(error = %e, "identity refresh failed; keeping current token");
                token
            }
        };

        Ok(Self(token))
    }
}

/// Extractor that optionally gets the current customer's token.
///
/// Unlike [`CurrentCustomer`], this does not reject unauthenticated requests
/// and does not refresh - it is a plain read of whatever the session holds.
pub struct OptionalCustomer(pub Option<SessionToken>);

impl<S> FromRequestParts<S> for OptionalCustomer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<SessionToken>(session_keys::IDENTITY_TOKEN)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(token))
    }
}

/// Helper to store the identity token in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_identity_token(
    session: &Session,
    token: &SessionToken,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::IDENTITY_TOKEN, token).await
}

/// Helper to clear the identity token from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_identity_token(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<SessionToken>(session_keys::IDENTITY_TOKEN)
        .await?;
    Ok(())
}
