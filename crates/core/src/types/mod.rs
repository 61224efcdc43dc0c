//! Core types for Haven.
//!
//! The identity data model shared between the portal and its tests.

pub mod claims;
pub mod customer;
pub mod referral;
pub mod session;
pub mod token;

pub use claims::IdentityClaims;
pub use customer::CustomerRecord;
pub use referral::{REFERRAL_AMOUNT, ReferralEvent, ReferralStatus};
pub use session::{Session, SessionUser};
pub use token::SessionToken;
