use service_core::error::AppError;
use thiserror::Error;

use crate::repository::StoreError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Refresh token not found")]
    RefreshTokenNotFound,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Book not found")]
    BookNotFound,

    #[error("Email already registered")]
    EmailAlreadyRegistered,
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::EmailAlreadyRegistered => {
                AppError::Conflict(anyhow::anyhow!("email already registered"))
            }
            ServiceError::Store(StoreError::Conflict(_)) => {
                AppError::Conflict(anyhow::anyhow!("resource already exists"))
            }
            ServiceError::Store(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::InvalidCredentials => {
                AppError::Unauthorized(anyhow::anyhow!("invalid email or password"))
            }
            ServiceError::RefreshTokenNotFound => {
                AppError::Unauthorized(anyhow::anyhow!("invalid refresh token"))
            }
            ServiceError::RefreshTokenExpired => {
                AppError::Unauthorized(anyhow::anyhow!("refresh token expired"))
            }
            ServiceError::BookNotFound => AppError::NotFound(anyhow::anyhow!("book not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::time::Duration;

    #[test]
    fn maps_to_http_statuses() {
        let cases = [
            (ServiceError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ServiceError::RefreshTokenNotFound, StatusCode::UNAUTHORIZED),
            (ServiceError::RefreshTokenExpired, StatusCode::UNAUTHORIZED),
            (ServiceError::BookNotFound, StatusCode::NOT_FOUND),
            (
                ServiceError::Store(StoreError::Conflict("dup".into())),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::Store(StoreError::Timeout {
                    op: "get book",
                    after: Duration::from_secs(5),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn only_user_conflicts_mention_email() {
        let user = AppError::from(ServiceError::EmailAlreadyRegistered);
        let session = AppError::from(ServiceError::Store(StoreError::Conflict(
            "create refresh session: duplicate value".into(),
        )));

        assert_eq!(user.to_string(), "Conflict: email already registered");
        assert_eq!(session.to_string(), "Conflict: resource already exists");
    }
}
