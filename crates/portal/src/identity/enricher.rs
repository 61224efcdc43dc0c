//! Session token enrichment.

use haven_core::{IdentityClaims, SessionToken};

use crate::backend::{BackendClient, CustomerUpsert};
use crate::identity::error::EnrichmentFailure;
use crate::identity::resolver::CustomerResolver;

/// The central state transition of the pipeline.
///
/// Runs at token issuance and again on every refresh; backend-resolved
/// values always win over provider-supplied ones. All awaits are strictly
/// sequential - upsert, then primary lookup, then the single fallback - so a
/// refresh costs at most three external round trips and never fans out.
///
/// Enrichment can never fail an authentication: [`Self::issue`] absorbs
/// every backend failure itself, and [`Self::refresh`] hands its failure
/// back for the call site to log and discard.
pub struct SessionEnricher {
    backend: BackendClient,
    resolver: CustomerResolver,
}

impl SessionEnricher {
    /// Create an enricher over the backend customer store.
    #[must_use]
    pub fn new(backend: BackendClient) -> Self {
        let resolver = CustomerResolver::new(backend.clone());
        Self { backend, resolver }
    }

    /// Issue a token for a fresh login.
    ///
    /// Seeds the token from provider claims, pushes an upsert to the
    /// customer store, then resolves the canonical record. Both backend
    /// steps are best-effort: on failure the token simply keeps its
    /// provider-supplied values.
    pub async fn issue(&self, claims: &IdentityClaims) -> SessionToken {
        let token = SessionToken::from_claims(claims);

        if let Err(e) = self.upsert(&token).await {
            tracing::warn!(error = %e, "customer upsert failed; continuing with provider values");
        }

        match self.refresh(&token).await {
            Ok(enriched) => enriched,
            Err(e) => {
                tracing::warn!(error = %e, "initial resolution failed; continuing with provider values");
                token
            }
        }
    }

    /// Push the provider-supplied profile to the customer store.
    async fn upsert(&self, token: &SessionToken) -> Result<(), EnrichmentFailure> {
        self.backend
            .upsert_customer(&CustomerUpsert::from(token))
            .await?;
        Ok(())
    }

    /// Re-resolve a token against the customer store.
    ///
    /// On success the returned copy carries the store's `mobile`, `name`,
    /// `email`, and `referral_code`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentFailure`] when no lookup key resolves. Callers
    /// log it and keep the token they already have; it must never surface
    /// to the user.
    pub async fn refresh(&self, token: &SessionToken) -> Result<SessionToken, EnrichmentFailure> {
        let record = self.resolver.resolve(token).await?;

        let mut refreshed = token.clone();
        refreshed.apply_record(&record);
        Ok(refreshed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackendApiConfig;
    use secrecy::SecretString;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn enricher_for(server: &MockServer) -> SessionEnricher {
        let backend = BackendClient::new(&BackendApiConfig {
            base_url: server.uri(),
            api_key: SecretString::from("test-key"),
        })
        .unwrap();
        SessionEnricher::new(backend)
    }

    fn claims() -> IdentityClaims {
        IdentityClaims {
            subject_id: "sub-1".to_string(),
            email: Some("a@b.com".to_string()),
            phone_number: None,
            display_name: Some("Ada".to_string()),
            photo_url: None,
        }
    }

    fn record_json(mobile: &str, code: &str) -> serde_json::Value {
        json!({
            "id": "c-1",
            "name": "Ada Lovelace",
            "email": "a@b.com",
            "mobile": mobile,
            "avatar": "",
            "referralCode": code
        })
    }

    #[tokio::test]
    async fn test_issue_upserts_then_resolves() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customer"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/customer/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/customer/a%40b.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record_json("999", "R1")))
            .mount(&server)
            .await;

        let token = enricher_for(&server).issue(&claims()).await;

        assert_eq!(token.mobile, "999");
        assert_eq!(token.name, "Ada Lovelace");
        assert_eq!(token.referral_code, "R1");
    }

    #[tokio::test]
    async fn test_issue_survives_upsert_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/customer"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        // Upsert and both lookups fail; login still proceeds with the
        // provider-supplied values.
        let token = enricher_for(&server).issue(&claims()).await;

        assert_eq!(token.email, "a@b.com");
        assert_eq!(token.name, "Ada");
        assert_eq!(token.mobile, "");
        assert_eq!(token.referral_code, "");
    }

    #[tokio::test]
    async fn test_refresh_failure_leaves_token_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let before = SessionToken {
            mobile: "999".to_string(),
            name: "X".to_string(),
            email: "x@y.com".to_string(),
            referral_code: "R1".to_string(),
            avatar: "a".to_string(),
        };

        let enricher = enricher_for(&server);
        let result = enricher.refresh(&before).await;
        assert!(result.is_err());

        // The caller keeps its token; field-for-field identical.
        assert_eq!(
            before,
            SessionToken {
                mobile: "999".to_string(),
                name: "X".to_string(),
                email: "x@y.com".to_string(),
                referral_code: "R1".to_string(),
                avatar: "a".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_are_last_write_wins() {
        let server = MockServer::start().await;
        // First refresh gets a slow answer resolving to mobile A; the later
        // one gets a fast answer resolving to mobile B. Whichever write
        // lands last owns the slot - here, the slow first refresh.
        Mock::given(method("GET"))
            .and(path("/customer/999"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(record_json("111-slow", "RA"))
                    .set_delay(Duration::from_millis(300)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/customer/999"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record_json("222-fast", "RB")))
            .mount(&server)
            .await;

        let enricher = Arc::new(enricher_for(&server));
        let token = SessionToken {
            mobile: "999".to_string(),
            ..SessionToken::default()
        };
        let slot = Arc::new(Mutex::new(token.clone()));

        let first = {
            let (enricher, token, slot) = (enricher.clone(), token.clone(), slot.clone());
            tokio::spawn(async move {
                let refreshed = enricher.refresh(&token).await.unwrap();
                *slot.lock().await = refreshed;
            })
        };
        let second = {
            let (enricher, token, slot) = (enricher.clone(), token, slot.clone());
            tokio::spawn(async move {
                // Start after the first request is already in flight.
                tokio::time::sleep(Duration::from_millis(100)).await;
                let refreshed = enricher.refresh(&token).await.unwrap();
                *slot.lock().await = refreshed;
            })
        };

        first.await.unwrap();
        second.await.unwrap();

        // No locking or versioning: completion order decides.
        assert_eq!(slot.lock().await.mobile, "111-slow");
    }
}
