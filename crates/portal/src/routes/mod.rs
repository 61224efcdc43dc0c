//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database probe)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /api/auth/login         - Sign in with a provider assertion
//! POST /auth/logout            - Clear the session, redirect home
//! GET  /auth/callback          - Post-login callback (optional ?ref= referral code)
//!
//! # Session
//! GET  /api/session            - Client-visible session projection
//! ```
//!
//! Listing, blog, and gallery pages are served by the rendering tier against
//! the backend content API and do not pass through this binary.

mod auth;
mod callback;
mod health;
mod home;
mod session;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the portal router.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/auth/login", get(auth::login_page))
        .route("/api/auth/login", post(auth::sign_in))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/callback", get(callback::callback))
        .route("/api/session", get(session::current_session))
}

/// Build the health check router.
#[must_use]
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}
