//! Post-login callback route.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;

use crate::identity::referral;
use crate::middleware::CurrentCustomer;
use crate::state::AppState;

/// Query parameters of the post-login callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Referral code the user arrived with, if any.
    #[serde(rename = "ref")]
    pub referral_code: Option<String>,
}

/// Handle the post-login callback.
///
/// Authenticated requests carrying a `ref` code credit the referral
/// best-effort: the POST is awaited (bounded) so the redirect does not
/// cancel it in flight, but its outcome never changes the user-visible
/// result - this handler always ends at `/`.
///
/// Unauthenticated requests are redirected to the login page by the
/// [`CurrentCustomer`] extractor before any referral work happens.
///
/// # Route
///
/// `GET /auth/callback`
pub async fn callback(
    State(state): State<AppState>,
    CurrentCustomer(token): CurrentCustomer,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    if let Some(code) = query.referral_code.as_deref().filter(|c| !c.is_empty()) {
        let submission = state.referrals().submit(&token, code);

        if let Err(e) = submission.settle(referral::SETTLE_TIMEOUT).await {
            tracing::warn!(error = %e, referral_code = %code, "referral completion failed");
        } else {
            tracing::info!(referral_code = %code, "referral completion recorded");
        }
    }

    Redirect::to("/")
}
