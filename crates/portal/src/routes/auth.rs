//! Authentication route handlers.
//!
//! Both federated channels (OAuth and phone one-time-code) complete on the
//! client with the provider issuing a signed assertion; the client then
//! posts that assertion here. The portal never sees passwords or one-time
//! codes.

use axum::{Json, extract::State, response::Html, response::Redirect};
use tower_sessions::Session;

use haven_core::Session as ClientSession;

use crate::error::Result;
use crate::identity::project;
use crate::middleware::auth::{clear_identity_token, set_identity_token};
use crate::models::session::SignInRequest;
use crate::state::AppState;

/// Login page.
///
/// Presentation lives in the rendering tier; this placeholder keeps the
/// route (and the unauthenticated-redirect target) stable.
///
/// # Route
///
/// `GET /auth/login`
pub async fn login_page() -> Html<&'static str> {
    Html(
        "<!doctype html>\
         <html><head><title>Sign in - Haven</title></head>\
         <body><h1>Sign in</h1>\
         <p>Continue with Google or with your phone number.</p></body></html>",
    )
}

/// Sign in with a provider assertion.
///
/// Verifies the assertion, issues an enriched identity token, stores it in
/// the session, and returns the client-visible projection. Only credential
/// verification can fail this request - enrichment failures are absorbed
/// inside the enricher.
///
/// # Route
///
/// `POST /api/auth/login`
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<SignInRequest>,
) -> Result<Json<ClientSession>> {
    let claims = state.verifier().verify(&request.assertion).await?;

    let token = state.enricher().issue(&claims).await;

    // Rotate the session id across the privilege change
    session.cycle_id().await?;
    set_identity_token(&session, &token).await?;

    tracing::info!(subject_id = %claims.subject_id, "customer signed in");

    Ok(Json(project(&token)))
}

/// Log out.
///
/// # Route
///
/// `POST /auth/logout`
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_identity_token(&session).await?;
    session.flush().await?;

    Ok(Redirect::to("/"))
}
