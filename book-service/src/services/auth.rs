use chrono::Utc;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::{
    models::{AuditAction, AuditEntity, NewUser, RefreshSession},
    repository::{SessionStore, StoreError, UserRepository},
    services::{Auditor, JwtService, ServiceError},
    utils::{hash_password, verify_password, Password, PasswordHashString},
};

/// Access token plus the refresh token persisted for it.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    audit: Auditor,
    jwt: JwtService,
    single_use_refresh_tokens: bool,
    // Verified against when the email is unknown, so both failures cost one Argon2 run.
    dummy_hash: Arc<OnceCell<PasswordHashString>>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        audit: Auditor,
        jwt: JwtService,
        single_use_refresh_tokens: bool,
    ) -> Self {
        Self {
            users,
            sessions,
            audit,
            jwt,
            single_use_refresh_tokens,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn sign_up(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<i64, ServiceError> {
        let password_hash = hash_blocking(Password::new(password)).await?;

        let user_id = self
            .users
            .create_user(NewUser::new(name, email, password_hash.into_string()))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => ServiceError::EmailAlreadyRegistered,
                other => ServiceError::Store(other),
            })?;

        tracing::info!(user_id, "User registered");
        self.audit
            .record(AuditAction::Register, AuditEntity::User, user_id, "auth.sign_up");

        Ok(user_id)
    }

    /// Unknown email and wrong password fail identically.
    pub async fn sign_in(&self, email: &str, password: String) -> Result<TokenPair, ServiceError> {
        let password = Password::new(password);

        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| hash_blocking(Password::new("dummy-password".to_string())))
                    .await?
                    .clone();
                verify_blocking(password, dummy).await?;
                return Err(ServiceError::InvalidCredentials);
            }
        };

        let stored = PasswordHashString::new(user.password_hash.clone());
        if !verify_blocking(password, stored).await? {
            tracing::warn!(user_id = user.id, "Sign-in rejected: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(user.id).await?;

        tracing::info!(user_id = user.id, "User signed in");
        self.audit
            .record(AuditAction::Login, AuditEntity::User, user.id, "auth.sign_in");

        Ok(tokens)
    }

    /// Exchange a refresh token for a new pair.
    ///
    /// With single-use tokens the session is claimed by deleting it before
    /// anything is issued; only the caller whose delete removed the row wins.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, ServiceError> {
        let session = self
            .sessions
            .get(refresh_token)
            .await?
            .ok_or(ServiceError::RefreshTokenNotFound)?;

        if session.is_expired_at(Utc::now()) {
            tracing::info!(user_id = session.user_id, "Refresh token expired");
            return Err(ServiceError::RefreshTokenExpired);
        }

        if self.single_use_refresh_tokens && !self.sessions.delete(&session.token).await? {
            tracing::warn!(user_id = session.user_id, "Refresh token already consumed");
            return Err(ServiceError::RefreshTokenNotFound);
        }

        let tokens = self.issue_tokens(session.user_id).await?;

        tracing::info!(user_id = session.user_id, "Tokens refreshed");
        Ok(tokens)
    }

    async fn issue_tokens(&self, user_id: i64) -> Result<TokenPair, ServiceError> {
        let access_token = self.jwt.generate_access_token(user_id)?;
        let refresh_token = self.jwt.generate_refresh_token();

        self.sessions
            .create(RefreshSession::new(
                user_id,
                refresh_token.clone(),
                self.jwt.refresh_token_expiry_days(),
            ))
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

async fn hash_blocking(password: Password) -> Result<PasswordHashString, ServiceError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| anyhow::anyhow!("Password hashing task failed: {}", e))??;
    Ok(hash)
}

async fn verify_blocking(
    password: Password,
    stored: PasswordHashString,
) -> Result<bool, ServiceError> {
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))??;
    Ok(matches)
}
