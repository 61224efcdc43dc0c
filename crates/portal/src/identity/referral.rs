//! Referral completion reporting.

use std::time::Duration;

use tokio::task::JoinHandle;

use haven_core::{ReferralEvent, SessionToken};

use crate::backend::BackendClient;
use crate::identity::error::ReferralPostFailure;

/// How long the callback waits for a referral POST before redirecting
/// without it.
pub const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts referral completion events to the backend.
///
/// Crediting is at-least-once by design of the surrounding flow: the event
/// carries no idempotency key, and revisiting the callback URL with the same
/// code emits a fresh event each time.
#[derive(Clone)]
pub struct ReferralReporter {
    backend: BackendClient,
}

impl ReferralReporter {
    /// Create a reporter over the backend referral endpoint.
    #[must_use]
    pub const fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Start posting a completion event for the session's customer.
    ///
    /// The POST runs on its own task, so it is not cancelled if the caller
    /// drops the returned [`ReferralSubmission`]. Callers that care about
    /// the outcome await [`ReferralSubmission::settle`]; the redirect
    /// decision must not depend on it either way.
    #[must_use]
    pub fn submit(&self, token: &SessionToken, referral_code: &str) -> ReferralSubmission {
        let event = ReferralEvent::completed(token, referral_code);
        let backend = self.backend.clone();

        let handle = tokio::spawn(async move {
            backend
                .submit_referral(&event)
                .await
                .map_err(ReferralPostFailure::from)
        });

        ReferralSubmission { handle }
    }
}

/// Completion signal for an in-flight referral POST.
pub struct ReferralSubmission {
    handle: JoinHandle<Result<(), ReferralPostFailure>>,
}

impl ReferralSubmission {
    /// Wait for the POST to finish, up to `timeout`.
    ///
    /// On timeout the task keeps running detached; waiting is only about
    /// avoiding a request-cancellation race, never about gating the
    /// redirect.
    ///
    /// # Errors
    ///
    /// Returns [`ReferralPostFailure`] if the POST failed, the task died,
    /// or the wait timed out.
    pub async fn settle(self, timeout: Duration) -> Result<(), ReferralPostFailure> {
        match tokio::time::timeout(timeout, self.handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(ReferralPostFailure::Task(join_error.to_string())),
            Err(_) => Err(ReferralPostFailure::Timeout),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackendApiConfig;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reporter_for(server: &MockServer) -> ReferralReporter {
        let backend = BackendClient::new(&BackendApiConfig {
            base_url: server.uri(),
            api_key: SecretString::from("test-key"),
        })
        .unwrap();
        ReferralReporter::new(backend)
    }

    fn token() -> SessionToken {
        SessionToken {
            mobile: "+15550100".to_string(),
            name: "Ada".to_string(),
            email: "a@b.com".to_string(),
            referral_code: String::new(),
            avatar: String::new(),
        }
    }

    #[tokio::test]
    async fn test_submit_posts_fixed_amount_completion() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/referrals"))
            .and(body_json(json!({
                "referredEmail": "a@b.com",
                "referredName": "Ada",
                "referredMobile": "+15550100",
                "referralCode": "ABC123",
                "status": "completed",
                "referralAmount": 1000
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let submission = reporter_for(&server).submit(&token(), "ABC123");
        submission.settle(SETTLE_TIMEOUT).await.unwrap();
    }

    #[tokio::test]
    async fn test_settle_reports_non_2xx_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/referrals"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let submission = reporter_for(&server).submit(&token(), "ABC123");
        let err = submission.settle(SETTLE_TIMEOUT).await.unwrap_err();
        assert!(matches!(err, ReferralPostFailure::Backend(_)));
    }

    #[tokio::test]
    async fn test_dropped_submission_still_posts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/referrals"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        // Dropping the handle must not cancel the spawned POST.
        drop(reporter_for(&server).submit(&token(), "ABC123"));
        tokio::time::sleep(Duration::from_millis(200)).await;
        // MockServer verifies expect(1) on drop.
    }
}
