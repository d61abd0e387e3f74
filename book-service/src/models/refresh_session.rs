//! Refresh session model - one outstanding refresh token.

use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

/// Refresh session entity.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RefreshSession {
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl RefreshSession {
    /// Create a session that expires `expiry_days` from now.
    pub fn new(user_id: i64, token: String, expiry_days: i64) -> Self {
        Self {
            user_id,
            token,
            expires_at: Utc::now() + Duration::days(expiry_days),
        }
    }

    /// A session is expired once `now` reaches its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
