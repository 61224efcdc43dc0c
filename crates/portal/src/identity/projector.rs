//! Session projection.

use haven_core::{Session, SessionToken};

/// Project the server-held token into the client-visible session shape.
///
/// Pure field selection and renaming - no network access, no mutation - so
/// it is safe to call on every request.
#[must_use]
pub fn project(token: &SessionToken) -> Session {
    Session::from(token)
}
