//! Referral completion events.

use serde::{Deserialize, Serialize};

use crate::token::SessionToken;

/// Reward amount credited for a completed referral.
pub const REFERRAL_AMOUNT: u32 = 1000;

/// Lifecycle state of a referral event.
///
/// The portal only ever emits `Completed`; the backend owns any further
/// states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    /// The referred customer finished onboarding.
    Completed,
}

/// A one-shot record crediting a referral code for a completed signup.
///
/// Posted every time the post-login callback fires with a referral code
/// present; nothing de-duplicates it against earlier events for the same
/// `(referred_email, referral_code)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralEvent {
    /// Email of the referred (newly signed-up) customer.
    pub referred_email: String,
    /// Name of the referred customer.
    pub referred_name: String,
    /// Mobile number of the referred customer.
    pub referred_mobile: String,
    /// The code the referred customer arrived with.
    pub referral_code: String,
    /// Always [`ReferralStatus::Completed`] when emitted by the portal.
    pub status: ReferralStatus,
    /// Fixed reward amount, [`REFERRAL_AMOUNT`].
    pub referral_amount: u32,
}

impl ReferralEvent {
    /// Build a completion event for the session's customer and a code.
    #[must_use]
    pub fn completed(token: &SessionToken, referral_code: impl Into<String>) -> Self {
        Self {
            referred_email: token.email.clone(),
            referred_name: token.name.clone(),
            referred_mobile: token.mobile.clone(),
            referral_code: referral_code.into(),
            status: ReferralStatus::Completed,
            referral_amount: REFERRAL_AMOUNT,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_event_wire_form() {
        let token = SessionToken {
            mobile: "+15550100".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            referral_code: String::new(),
            avatar: String::new(),
        };

        let event = ReferralEvent::completed(&token, "ABC123");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["referredEmail"], "ada@example.com");
        assert_eq!(json["referredName"], "Ada");
        assert_eq!(json["referredMobile"], "+15550100");
        assert_eq!(json["referralCode"], "ABC123");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["referralAmount"], 1000);
    }
}
