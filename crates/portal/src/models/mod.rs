//! Request/response models and session storage keys.

pub mod session;

pub use session::keys as session_keys;
