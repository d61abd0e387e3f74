//! PostgreSQL store.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::time::Duration;

use super::{BookRepository, SessionStore, Store, StoreError, UserRepository};
use crate::config::DatabaseConfig;
use crate::models::{Book, NewBook, NewUser, RefreshSession, User};

/// Create a PostgreSQL connection pool.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.url)
        .await?;

    tracing::info!("Successfully connected to PostgreSQL");

    Ok(pool)
}

/// Run database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

/// PostgreSQL-backed store. Every statement is bounded by `query_timeout`.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    query_timeout: Duration,
}

impl Database {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, op: &'static str, query: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(|e| StoreError::from_sqlx(op, e)),
            Err(_) => {
                tracing::warn!(op, timeout = ?self.query_timeout, "Query timed out");
                Err(StoreError::Timeout {
                    op,
                    after: self.query_timeout,
                })
            }
        }
    }
}

#[async_trait]
impl UserRepository for Database {
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError> {
        self.bounded(
            "create user",
            sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO users (name, email, password_hash, registered_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.registered_at)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.bounded(
            "find user by email",
            sqlx::query_as::<_, User>(
                "SELECT id, name, email, password_hash, registered_at FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await
    }
}

#[async_trait]
impl SessionStore for Database {
    async fn create(&self, session: RefreshSession) -> Result<(), StoreError> {
        self.bounded(
            "create refresh session",
            sqlx::query("INSERT INTO refresh_tokens (user_id, token, expires_at) VALUES ($1, $2, $3)")
                .bind(session.user_id)
                .bind(&session.token)
                .bind(session.expires_at)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<RefreshSession>, StoreError> {
        self.bounded(
            "get refresh session",
            sqlx::query_as::<_, RefreshSession>(
                "SELECT user_id, token, expires_at FROM refresh_tokens WHERE token = $1",
            )
            .bind(token)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn delete(&self, token: &str) -> Result<bool, StoreError> {
        let result = self
            .bounded(
                "delete refresh session",
                sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
                    .bind(token)
                    .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl BookRepository for Database {
    async fn create_book(&self, book: NewBook) -> Result<i64, StoreError> {
        self.bounded(
            "create book",
            sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO books (title, author, publish_date, rating)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(&book.title)
            .bind(&book.author)
            .bind(book.publish_date)
            .bind(book.rating)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, StoreError> {
        self.bounded(
            "get book",
            sqlx::query_as::<_, Book>(
                "SELECT id, title, author, publish_date, rating FROM books WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        self.bounded(
            "list books",
            sqlx::query_as::<_, Book>(
                "SELECT id, title, author, publish_date, rating FROM books ORDER BY id",
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn update_book(&self, id: i64, book: NewBook) -> Result<bool, StoreError> {
        let result = self
            .bounded(
                "update book",
                sqlx::query(
                    r#"
                    UPDATE books
                    SET title = $1, author = $2, publish_date = $3, rating = $4
                    WHERE id = $5
                    "#,
                )
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.publish_date)
                .bind(book.rating)
                .bind(id)
                .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_book(&self, id: i64) -> Result<bool, StoreError> {
        let result = self
            .bounded(
                "delete book",
                sqlx::query("DELETE FROM books WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for Database {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.bounded(
            "health check",
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}
