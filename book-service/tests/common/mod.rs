//! Shared setup for book-service router tests.
//!
//! Everything runs against `InMemoryStore`, so no database is needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use book_service::{
    build_router,
    config::{
        AuditConfig, BookServiceConfig, DatabaseConfig, Environment, JwtConfig, SecurityConfig,
        SwaggerConfig,
    },
    repository::InMemoryStore,
    services::RecordingAudit,
    AppState,
};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub fn test_config() -> BookServiceConfig {
    BookServiceConfig {
        common: service_core::config::Config::default(),
        environment: Environment::Dev,
        service_name: "book-service".to_string(),
        service_version: "test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 1,
            query_timeout_secs: 5,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_minutes: 60,
            refresh_token_expiry_days: 30,
            single_use_refresh_tokens: true,
        },
        audit: AuditConfig {
            endpoint: None,
            timeout_ms: 2000,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            secure_cookies: false,
        },
        swagger: SwaggerConfig { enabled: true },
        request_timeout_secs: 30,
    }
}

/// A response with its body already read.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Value of the `refresh-token` cookie set by this response, if any.
    pub fn refresh_cookie(&self) -> Option<String> {
        self.set_cookie_header()
            .and_then(|raw| raw.split(';').next().map(str::to_string))
            .and_then(|pair| pair.strip_prefix("refresh-token=").map(str::to_string))
    }

    pub fn set_cookie_header(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub audit: Arc<RecordingAudit>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: BookServiceConfig) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();

        let store = Arc::new(InMemoryStore::new());
        let audit = Arc::new(RecordingAudit::new());
        let state = AppState::new(config, store.clone(), audit.clone())
            .expect("Failed to build app state");
        let router = build_router(state.clone());

        Self {
            router,
            state,
            store,
            audit,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        bearer: Option<&str>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/auth/sign-up",
            Some(serde_json::json!({ "name": name, "email": email, "password": password })),
            None,
            None,
        )
        .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/auth/sign-in",
            Some(serde_json::json!({ "email": email, "password": password })),
            None,
            None,
        )
        .await
    }

    /// Sign up and sign in a fresh user, returning its access token.
    pub async fn access_token(&self) -> String {
        self.sign_up("Ann", "ann@example.com", "password1").await;
        let response = self.sign_in("ann@example.com", "password1").await;
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Let fire-and-forget audit tasks run.
    pub async fn settle(&self) {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }
}
