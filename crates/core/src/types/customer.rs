//! Canonical customer record.

use serde::{Deserialize, Serialize};

/// The authoritative customer representation held by the backend store.
///
/// Created or updated by the upsert at login and read back by the resolver on
/// every session refresh. Records are keyed preferentially by mobile number,
/// with email as a secondary key; the store enforces no uniqueness constraint
/// across the two keys, so whichever key resolves first is treated as
/// canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    /// Store-assigned record identifier.
    pub id: String,
    /// Customer's full name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Mobile number.
    #[serde(default)]
    pub mobile: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: String,
    /// Referral code owned by this customer.
    #[serde(default)]
    pub referral_code: String,
}
