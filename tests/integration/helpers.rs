//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::{Json, http::Request};
use serde_json::{Value, json};
use tower::ServiceExt;

use citygate_api::extractors::AuthUser;
use citygate_api::middleware::permission::{PermissionGate, require_permission};
use citygate_api::{AppState, build_app};
use citygate_auth::{Authorizer, TokenService};
use citygate_cache::CacheManager;
use citygate_cache::memory::MemoryCacheProvider;
use citygate_core::config::AppConfig;
use citygate_core::config::worker::SyncStrategy;
use citygate_core::types::{Clock, ManualClock};
use citygate_database::{CredentialStore, MemoryCredentialStore};
use citygate_worker::PermissionSyncJob;

/// Permission required by the gated test route.
pub const GATED_PERMISSION: &str = "manage_events";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    pub store: Arc<MemoryCredentialStore>,
    pub cache: Arc<CacheManager>,
    pub clock: Arc<ManualClock>,
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application on the memory store and cache
    pub async fn new() -> Self {
        let mut config = AppConfig::default();
        config.cache.provider = "memory".into();
        config.database.provider = "memory".into();
        config.auth.jwt_secret = "test-access-secret".into();
        config.auth.jwt_refresh_secret = "test-refresh-secret".into();

        let store = Arc::new(MemoryCredentialStore::with_public_grants("generalpublic").await);
        let cache = Arc::new(CacheManager::from_provider(Arc::new(
            MemoryCacheProvider::new(),
        )));
        let clock = Arc::new(ManualClock::starting_now());

        let dyn_store: Arc<dyn CredentialStore> = store.clone();
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let tokens = Arc::new(
            TokenService::new(&config.auth, dyn_store.clone(), cache.clone(), dyn_clock)
                .expect("Failed to build token service"),
        );
        let authorizer = Arc::new(Authorizer::new(
            &config.session,
            tokens.sessions().clone(),
            dyn_store.clone(),
        ));

        let state = AppState::new(
            Arc::new(config.clone()),
            dyn_store,
            cache.clone(),
            tokens,
            authorizer,
        );

        let gated = Router::new()
            .route("/api/events", get(list_events))
            .route_layer(from_fn_with_state(
                PermissionGate::new(state.clone(), GATED_PERMISSION),
                require_permission,
            ))
            .with_state(state.clone());

        let router = build_app(state).merge(gated);

        Self {
            router,
            store,
            cache,
            clock,
            config,
        }
    }

    /// Rebuild the permission cache the way the worker does
    pub async fn sync_permissions(&self) {
        let store: Arc<dyn CredentialStore> = self.store.clone();
        PermissionSyncJob::new(store, self.cache.clone(), SyncStrategy::Replace)
            .sync()
            .await
            .expect("Permission sync failed");
    }

    /// Register a user, asserting success
    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({
                    "firstName": "Ana",
                    "lastName": "Lima",
                    "email": email,
                    "password": password,
                    "phoneNumber": "5550100",
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response
    }

    /// Log in, returning the raw response
    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": email, "password": password })),
            None,
        )
        .await
    }

    /// Send a request with an optional bearer token
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let authorization = token.map(|t| format!("Bearer {t}"));
        self.request_with_header(method, path, body, authorization.as_deref())
            .await
    }

    /// Send a request with a raw `Authorization` header value
    pub async fn request_with_header(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        authorization: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);

        let body = match body {
            Some(b) => {
                req = req.header("Content-Type", "application/json");
                Body::from(serde_json::to_string(&b).expect("Failed to serialize body"))
            }
            None => Body::empty(),
        };

        if let Some(value) = authorization {
            req = req.header("Authorization", value);
        }

        let req = req.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

async fn list_events(auth: AuthUser) -> Json<Value> {
    Json(json!({ "userId": auth.user_id(), "events": [] }))
}

/// Test response wrapper
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn token(&self) -> String {
        self.body["token"].as_str().expect("no token").to_string()
    }

    pub fn refresh_token(&self) -> String {
        self.body["refreshToken"]
            .as_str()
            .expect("no refresh token")
            .to_string()
    }
}
