//! In-memory store with the same semantics as the PostgreSQL one.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use super::{BookRepository, SessionStore, Store, StoreError, UserRepository};
use crate::models::{Book, NewBook, NewUser, RefreshSession, User};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: HashMap<String, RefreshSession>,
    books: BTreeMap<i64, Book>,
    next_user_id: i64,
    next_book_id: i64,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("in-memory store mutex poisoned: {}", e)))
    }

    pub fn session_count(&self) -> usize {
        self.tables.lock().map(|t| t.sessions.len()).unwrap_or(0)
    }

    pub fn book_count(&self) -> usize {
        self.tables.lock().map(|t| t.books.len()).unwrap_or(0)
    }

    pub fn find_user_by_id(&self, id: i64) -> Option<User> {
        self.tables
            .lock()
            .ok()
            .and_then(|t| t.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<i64, StoreError> {
        let mut tables = self.lock()?;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("create user: duplicate value".to_string()));
        }
        tables.next_user_id += 1;
        let id = tables.next_user_id;
        tables.users.push(user.into_user(id));
        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn create(&self, session: RefreshSession) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if tables.sessions.contains_key(&session.token) {
            return Err(StoreError::Conflict(
                "create refresh session: duplicate value".to_string(),
            ));
        }
        tables.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<RefreshSession>, StoreError> {
        Ok(self.lock()?.sessions.get(token).cloned())
    }

    async fn delete(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.sessions.remove(token).is_some())
    }
}

#[async_trait]
impl BookRepository for InMemoryStore {
    async fn create_book(&self, book: NewBook) -> Result<i64, StoreError> {
        let mut tables = self.lock()?;
        tables.next_book_id += 1;
        let id = tables.next_book_id;
        tables.books.insert(id, book.into_book(id));
        Ok(id)
    }

    async fn get_book(&self, id: i64) -> Result<Option<Book>, StoreError> {
        Ok(self.lock()?.books.get(&id).cloned())
    }

    async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        Ok(self.lock()?.books.values().cloned().collect())
    }

    async fn update_book(&self, id: i64, book: NewBook) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        match tables.books.get_mut(&id) {
            Some(existing) => {
                *existing = book.into_book(id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_book(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.lock()?.books.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }
}
