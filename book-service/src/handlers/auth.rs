use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use service_core::error::AppError;

use crate::{
    dtos::auth::{RefreshResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse},
    services::ServiceError,
    utils::ValidatedJson,
    AppState,
};

pub const REFRESH_COOKIE: &str = "refresh-token";

fn refresh_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(state.config.security.secure_cookies)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::days(state.config.jwt.refresh_token_expiry_days))
        .build()
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User registered", body = SignUpResponse),
        (status = 400, description = "Invalid body or validation error", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SignUpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = state
        .auth_service
        .sign_up(req.name, req.email, req.password)
        .await?;
    Ok((StatusCode::CREATED, Json(SignUpResponse { id })))
}

/// Sign in with email and password
///
/// Returns an access token and sets the `refresh-token` cookie.
#[utoipa::path(
    post,
    path = "/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 400, description = "Invalid body or validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<SignInRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tokens = state.auth_service.sign_in(&req.email, req.password).await?;

    let jar = jar.add(refresh_cookie(&state, tokens.refresh_token));
    Ok((
        jar,
        Json(SignInResponse {
            token: tokens.access_token,
        }),
    ))
}

/// Exchange the `refresh-token` cookie for a new access token
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Tokens rotated", body = RefreshResponse),
        (status = 401, description = "Missing, unknown or expired refresh token", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let token = match jar.get(REFRESH_COOKIE) {
        None => {
            return Err(AppError::Unauthorized(anyhow::anyhow!("missing refresh token")));
        }
        Some(cookie) if cookie.value().is_empty() => {
            return Err(AppError::Unauthorized(anyhow::anyhow!("empty refresh token")));
        }
        Some(cookie) => cookie.value().to_string(),
    };

    let tokens = state
        .auth_service
        .refresh_tokens(&token)
        .await
        .map_err(|e| match e {
            ServiceError::RefreshTokenNotFound | ServiceError::RefreshTokenExpired => e.into(),
            other => {
                tracing::error!(error = %other, "Token refresh failed");
                AppError::Unauthorized(anyhow::anyhow!("invalid refresh token"))
            }
        })?;

    let jar = jar.add(refresh_cookie(&state, tokens.refresh_token));
    Ok((
        jar,
        Json(RefreshResponse {
            access_token: tokens.access_token,
        }),
    ))
}
