//! HTTP API boundary

pub mod admin;
pub mod auth;
pub mod health;
pub mod keys;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;
pub mod v1;

pub use router::create_router_with_state;
pub use state::AppState;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::Router;

    use crate::api::state::AppState;
    use crate::api::create_router_with_state;
    use crate::domain::account::{Account, AccountRole, AccountStatusOracle};
    use crate::domain::api_key::ApiKey;
    use crate::infrastructure::account::{
        AccountService, Argon2Hasher, InMemoryAccountRepository, RegisterAccountRequest,
    };
    use crate::infrastructure::api_key::{ApiKeyService, InMemoryApiKeyRepository};
    use crate::infrastructure::audit::{AuditRecorder, InMemoryAuditRepository};
    use crate::infrastructure::auth::{JwtConfig, JwtGenerator, JwtService};

    pub const TEST_PASSWORD: &str = "secret123";

    /// Fully wired in-memory application for router tests
    pub struct TestApp {
        pub state: AppState,
        pub accounts: Arc<AccountService<InMemoryAccountRepository>>,
        pub keys: Arc<ApiKeyService<InMemoryApiKeyRepository>>,
        pub jwt: Arc<JwtService>,
    }

    impl TestApp {
        pub fn new() -> Self {
            let account_repo = Arc::new(InMemoryAccountRepository::new());
            let key_repo = Arc::new(InMemoryApiKeyRepository::new());
            let recorder = AuditRecorder::new(Arc::new(InMemoryAuditRepository::new()));

            let accounts = Arc::new(AccountService::new(
                Arc::clone(&account_repo),
                Arc::new(Argon2Hasher::new()),
                recorder.clone(),
            ));

            let oracle: Arc<dyn AccountStatusOracle> = account_repo;
            let keys = Arc::new(ApiKeyService::new(key_repo, oracle, recorder.clone()));

            let jwt = Arc::new(JwtService::new(JwtConfig::new("test-secret", 24)));

            let state = AppState::new(
                accounts.clone(),
                keys.clone(),
                Arc::new(recorder),
                jwt.clone(),
            );

            Self {
                state,
                accounts,
                keys,
                jwt,
            }
        }

        pub fn router(&self) -> Router {
            create_router_with_state(self.state.clone())
        }

        pub async fn register(&self, email: &str, role: AccountRole) -> Account {
            self.accounts
                .register(
                    RegisterAccountRequest {
                        email: email.to_string(),
                        password: TEST_PASSWORD.to_string(),
                        role,
                        name: None,
                        username: None,
                    },
                    "127.0.0.1",
                )
                .await
                .unwrap()
        }

        pub fn token_for(&self, account: &Account) -> String {
            self.jwt.generate(account).unwrap()
        }

        pub async fn issue_key(&self, account: &Account) -> (ApiKey, String) {
            let issued = self
                .keys
                .issue(account.id(), "Test Key", Some(30), "127.0.0.1")
                .await
                .unwrap();
            (issued.api_key, issued.secret)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::testing::{TestApp, TEST_PASSWORD};
    use crate::domain::account::AccountRole;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_with_key(uri: &str, key: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("x-api-key", key)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = TestApp::new();

        let response = app.router().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.router().oneshot(get("/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.router().oneshot(get("/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let app = TestApp::new();
        app.register("user@example.com", AccountRole::User).await;

        let response = app
            .router()
            .oneshot(post_json(
                "/auth/login",
                None,
                serde_json::json!({"email": "user@example.com", "password": TEST_PASSWORD}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let token = json["token"].as_str().unwrap().to_string();
        assert_eq!(json["account"]["email"], "user@example.com");

        let me = Request::builder()
            .uri("/auth/me")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app.router().oneshot(me).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["email"], "user@example.com");
    }

    #[tokio::test]
    async fn test_login_bad_credentials() {
        let app = TestApp::new();
        app.register("user@example.com", AccountRole::User).await;

        let response = app
            .router()
            .oneshot(post_json(
                "/auth/login",
                None,
                serde_json::json!({"email": "user@example.com", "password": "wrong"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_validate_endpoint_contract_is_always_200() {
        let app = TestApp::new();
        let account = app.register("user@example.com", AccountRole::User).await;
        let (_, secret) = app.issue_key(&account).await;

        // Missing header
        let response = app.router().oneshot(get("/v1/validate")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"], "Missing API Key");

        // Unknown key
        let response = app
            .router()
            .oneshot(get_with_key("/v1/validate", "sk_never_issued"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"], "Invalid API Key");

        // Valid key
        let response = app
            .router()
            .oneshot(get_with_key("/v1/validate", &secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["valid"], true);
        assert_eq!(json["user_id"], account.id().as_str());
        assert_eq!(json["role"], "user");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_resource_gating() {
        let app = TestApp::new();
        let account = app.register("user@example.com", AccountRole::User).await;
        let (key, secret) = app.issue_key(&account).await;

        // Missing key on the middleware path is a 401
        let response = app.router().oneshot(get("/v1/resource")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Missing API Key");

        // Valid key grants access
        let response = app
            .router()
            .oneshot(get_with_key("/v1/resource", &secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Access Granted");
        assert_eq!(json["user_id"], account.id().as_str());

        // Revoked key is refused
        app.keys
            .revoke_owned(account.id(), key.id(), "127.0.0.1")
            .await
            .unwrap();

        let response = app
            .router()
            .oneshot(get_with_key("/v1/resource", &secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"], "API Key Revoked");
    }

    #[tokio::test]
    async fn test_inactive_account_is_403_on_gating_path() {
        let app = TestApp::new();
        let admin = app.register("admin@example.com", AccountRole::Admin).await;
        let account = app.register("user@example.com", AccountRole::User).await;
        let (_, secret) = app.issue_key(&account).await;

        app.accounts
            .toggle_status(admin.id(), account.id(), "127.0.0.1")
            .await
            .unwrap();

        let response = app
            .router()
            .oneshot(get_with_key("/v1/resource", &secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = body_json(response).await;
        assert_eq!(json["error"], "User Inactive - API Access Denied");
    }

    #[tokio::test]
    async fn test_user_lookup_scoping() {
        let app = TestApp::new();
        let admin = app.register("admin@example.com", AccountRole::Admin).await;
        let user = app.register("user@example.com", AccountRole::User).await;
        let other = app.register("other@example.com", AccountRole::User).await;

        let (_, user_secret) = app.issue_key(&user).await;
        let (_, admin_secret) = app.issue_key(&admin).await;

        // Own record works
        let uri = format!("/v1/users/{}", user.id());
        let response = app
            .router()
            .oneshot(get_with_key(&uri, &user_secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["email"], "user@example.com");
        assert!(json["data"].get("password_hash").is_none());

        // Someone else's record is forbidden for a plain user
        let uri = format!("/v1/users/{}", other.id());
        let response = app
            .router()
            .oneshot(get_with_key(&uri, &user_secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Admin key reaches any record
        let response = app
            .router()
            .oneshot(get_with_key(&uri, &admin_secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_key_self_service_flow() {
        let app = TestApp::new();
        let account = app.register("user@example.com", AccountRole::User).await;
        let token = app.token_for(&account);

        // Issue
        let response = app
            .router()
            .oneshot(post_json(
                "/keys",
                Some(&token),
                serde_json::json!({"name": "Mobile App", "expires_in_days": 30}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let secret = json["secret"].as_str().unwrap().to_string();
        let key_id = json["id"].as_str().unwrap().to_string();
        assert!(secret.starts_with("sk_"));
        assert_eq!(json["key_prefix"], secret[..10]);

        // List does not expose secrets
        let list = Request::builder()
            .uri("/keys")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.router().oneshot(list).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["total"], 1);
        assert!(json["api_keys"][0].get("secret").is_none());
        assert!(json["api_keys"][0].get("key_hash").is_none());

        // Revoke
        let response = app
            .router()
            .oneshot(post_json(
                &format!("/keys/{}/revoke", key_id),
                Some(&token),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "revoked");

        // The key no longer validates
        let response = app
            .router()
            .oneshot(get_with_key("/v1/validate", &secret))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["valid"], false);
        assert_eq!(json["error"], "API Key Revoked");
    }

    #[tokio::test]
    async fn test_keys_require_principal() {
        let app = TestApp::new();

        let response = app.router().oneshot(get("/keys")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_endpoints_require_admin() {
        let app = TestApp::new();
        let user = app.register("user@example.com", AccountRole::User).await;
        let token = app.token_for(&user);

        let request = Request::builder()
            .uri("/admin/accounts")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_toggle_gates_user_keys() {
        let app = TestApp::new();
        let admin = app.register("admin@example.com", AccountRole::Admin).await;
        let user = app.register("user@example.com", AccountRole::User).await;
        let (_, secret) = app.issue_key(&user).await;
        let admin_token = app.token_for(&admin);

        // Key works before the toggle
        let response = app
            .router()
            .oneshot(get_with_key("/v1/resource", &secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Admin deactivates the owner over HTTP
        let response = app
            .router()
            .oneshot(post_json(
                &format!("/admin/accounts/{}/toggle", user.id()),
                Some(&admin_token),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "inactive");

        // Every key the account owns fails immediately
        let response = app
            .router()
            .oneshot(get_with_key("/v1/resource", &secret))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_audit_feed() {
        let app = TestApp::new();
        let admin = app.register("admin@example.com", AccountRole::Admin).await;
        let user = app.register("user@example.com", AccountRole::User).await;
        app.issue_key(&user).await;
        let admin_token = app.token_for(&admin);

        let request = Request::builder()
            .uri("/admin/audit?limit=10")
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
            .body(Body::empty())
            .unwrap();

        let response = app.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        // Two registrations and one key issuance
        assert_eq!(json["total"], 3);
        assert_eq!(json["entries"][0]["action"], "KEY_ISSUED");
    }

    #[tokio::test]
    async fn test_admin_delete_key() {
        let app = TestApp::new();
        let admin = app.register("admin@example.com", AccountRole::Admin).await;
        let user = app.register("user@example.com", AccountRole::User).await;
        let (key, secret) = app.issue_key(&user).await;
        let admin_token = app.token_for(&admin);

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/admin/api-keys/{}", key.id()))
            .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
            .body(Body::empty())
            .unwrap();

        let response = app.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Deleted key is simply unknown now
        let response = app
            .router()
            .oneshot(get_with_key("/v1/validate", &secret))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid API Key");
    }
}
