pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod services;
pub mod utils;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, Request},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers_middleware, request_id_middleware, REQUEST_ID_HEADER,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::BookServiceConfig;
use crate::repository::Store;
use crate::services::{AuditSink, Auditor, AuthService, BookService, JwtService};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::sign_up,
        handlers::auth::sign_in,
        handlers::auth::refresh,
        handlers::books::create_book,
        handlers::books::get_book,
        handlers::books::list_books,
        handlers::books::update_book,
        handlers::books::delete_book,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::auth::SignUpRequest,
            dtos::auth::SignUpResponse,
            dtos::auth::SignInRequest,
            dtos::auth::SignInResponse,
            dtos::auth::RefreshResponse,
            dtos::books::CreateBookRequest,
            dtos::books::UpdateBookRequest,
            dtos::books::BookWriteResponse,
            models::Book,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-up, sign-in and token refresh"),
        (name = "Books", description = "Book catalogue"),
        (name = "Observability", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: BookServiceConfig,
    pub store: Arc<dyn Store>,
    pub jwt: JwtService,
    pub auth_service: AuthService,
    pub book_service: BookService,
}

impl AppState {
    /// Wire services over one store backend and one audit sink.
    pub fn new<S>(
        config: BookServiceConfig,
        store: Arc<S>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, AppError>
    where
        S: Store + 'static,
    {
        let jwt = JwtService::new(&config.jwt).map_err(AppError::ConfigError)?;
        let auditor = Auditor::new(audit);

        let auth_service = AuthService::new(
            store.clone(),
            store.clone(),
            auditor.clone(),
            jwt.clone(),
            config.jwt.single_use_refresh_tokens,
        );
        let book_service = BookService::new(store.clone(), auditor);

        Ok(Self {
            config,
            store,
            jwt,
            auth_service,
            book_service,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let book_routes = Router::new()
        .route(
            "/books",
            post(handlers::create_book).get(handlers::list_books),
        )
        .route(
            "/books/:id",
            get(handlers::get_book)
                .put(handlers::update_book)
                .delete(handlers::delete_book),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let mut app = Router::new().route("/health", get(health_check));

    if state.config.swagger.enabled {
        app = app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    }

    app.route("/auth/sign-up", post(handlers::sign_up))
        .route(
            "/auth/sign-in",
            post(handlers::sign_in).get(handlers::sign_in),
        )
        .route("/auth/refresh", post(handlers::refresh))
        .merge(book_routes)
        .with_state(state.clone())
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "http_request",
                request_id = %request_id,
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        }))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config.security.allowed_origins))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", o, e);
                None
            }
        })
        .collect();

    let layer = if allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(tower_http::cors::Any)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_credentials(true)
    };

    layer
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Store is unreachable", body = ErrorResponse)
    ),
    tag = "Observability"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.store.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Store health check failed");
        AppError::DatabaseError(anyhow::Error::new(e))
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "database": "up"
        }
    })))
}
