//! Session projection API.

use axum::Json;

use haven_core::Session;

use crate::identity::project;
use crate::middleware::CurrentCustomer;

/// Return the client-visible session.
///
/// Extracting [`CurrentCustomer`] already re-ran the resolution step, so the
/// projection here is pure and adds no latency of its own.
///
/// # Route
///
/// `GET /api/session`
pub async fn current_session(CurrentCustomer(token): CurrentCustomer) -> Json<Session> {
    Json(project(&token))
}
