//! Persistence for users, refresh sessions and books.
//!
//! Two backends implement the same traits: `Database` (PostgreSQL) and
//! `InMemoryStore` (tests and database-less local runs).

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Book, NewBook, NewUser, RefreshSession, User};

pub use memory::InMemoryStore;
pub use postgres::{create_pool, run_migrations, Database};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{op} timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    #[error("{0}")]
    Conflict(String),

    #[error("{op} failed: {source}")]
    Query {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Classify a driver error for operation `op`.
    pub fn from_sqlx(op: &'static str, err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(format!("{}: duplicate value", op));
            }
        }

        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                StoreError::Unavailable(format!("{}: {}", op, err))
            }
            other => StoreError::Query { op, source: other },
        }
    }
}

/// Credential store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return its id. A taken email is a `Conflict`.
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Refresh session store, keyed by token.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, session: RefreshSession) -> Result<(), StoreError>;

    async fn get(&self, token: &str) -> Result<Option<RefreshSession>, StoreError>;

    /// Returns false when no session had this token.
    async fn delete(&self, token: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn create_book(&self, book: NewBook) -> Result<i64, StoreError>;

    async fn get_book(&self, id: i64) -> Result<Option<Book>, StoreError>;

    /// All books ordered by id.
    async fn list_books(&self) -> Result<Vec<Book>, StoreError>;

    /// Returns false when no book has this id.
    async fn update_book(&self, id: i64, book: NewBook) -> Result<bool, StoreError>;

    /// Returns false when no book has this id.
    async fn delete_book(&self, id: i64) -> Result<bool, StoreError>;
}

/// A complete backend.
#[async_trait]
pub trait Store: UserRepository + SessionStore + BookRepository {
    async fn health_check(&self) -> Result<(), StoreError>;
}
