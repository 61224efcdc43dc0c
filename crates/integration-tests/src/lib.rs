//! Integration test harness for Haven.
//!
//! Drives the portal router directly with `tower::ServiceExt::oneshot`
//! instead of binding a listener. External collaborators - the identity
//! provider and the backend customer store - are `wiremock` servers, and
//! sessions use the in-memory store, so no test needs the database or the
//! network.
//!
//! ```rust,ignore
//! let ctx = TestContext::new().await;
//! ctx.mount_profile("sub-1", json!({ ... })).await;
//! let response = ctx.post_json("/api/auth/login", &body).await;
//! ```

#![allow(clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Request, Response};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};
use wiremock::MockServer;

use haven_portal::config::{BackendApiConfig, IdentityProviderConfig, PortalConfig};
use haven_portal::routes;
use haven_portal::state::AppState;

/// Shared secret test assertions are signed with.
pub const ASSERTION_SECRET: &str = "integration-test-assertion-signing-key";
/// Issuer expected by the portal under test.
pub const ISSUER: &str = "https://id.haven.test";
/// Audience expected by the portal under test.
pub const AUDIENCE: &str = "haven-portal";

/// A portal router wired to mock collaborators.
pub struct TestContext {
    /// The portal application.
    pub app: Router,
    /// Mock identity provider (profile endpoint).
    pub provider: MockServer,
    /// Mock backend (customer store + referrals).
    pub backend: MockServer,
}

impl TestContext {
    /// Build a portal against fresh mock servers and an empty session store.
    pub async fn new() -> Self {
        let provider = MockServer::start().await;
        let backend = MockServer::start().await;

        let config = PortalConfig {
            database_url: SecretString::from("postgres://localhost/haven_test_unused"),
            host: "127.0.0.1".parse().expect("valid host"),
            port: 0,
            base_url: "http://portal.haven.test".to_string(),
            session_secret: SecretString::from("0123456789abcdef0123456789abcdef"),
            identity: IdentityProviderConfig {
                issuer: ISSUER.to_string(),
                audience: AUDIENCE.to_string(),
                assertion_secret: SecretString::from(ASSERTION_SECRET),
                profile_url: provider.uri(),
                api_key: SecretString::from("test-provider-key"),
            },
            backend: BackendApiConfig {
                base_url: backend.uri(),
                api_key: SecretString::from("test-backend-key"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        // Lazy pool: nothing in these tests touches Postgres.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/haven_test_unused")
            .expect("lazy pool");

        let state = AppState::new(config, pool).expect("app state");

        let session_layer = SessionManagerLayer::new(MemoryStore::default())
            .with_name("haven_session")
            .with_secure(false);

        let app = Router::new()
            .merge(routes::routes())
            .layer(session_layer)
            .with_state(state);

        Self {
            app,
            provider,
            backend,
        }
    }

    /// Sign a login assertion for `sub` the way the provider would.
    #[must_use]
    pub fn sign_assertion(&self, sub: &str) -> String {
        let claims = serde_json::json!({
            "sub": sub,
            "iss": ISSUER,
            "aud": AUDIENCE,
            "exp": chrono::Utc::now().timestamp() + 3600,
        });
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(ASSERTION_SECRET.as_bytes()),
        )
        .expect("sign assertion")
    }

    /// Send a single request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router never errors")
    }

    /// POST a JSON body, optionally with a session cookie.
    pub async fn post_json(
        &self,
        uri: &str,
        body: &serde_json::Value,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    /// GET a path, optionally with a session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = builder.body(Body::empty()).expect("request");
        self.send(request).await
    }
}

/// Extract the session cookie pair (`name=value`) from a response.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("haven_session="))
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string)
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
