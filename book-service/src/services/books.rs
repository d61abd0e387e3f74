use std::sync::Arc;

use crate::{
    models::{AuditAction, AuditEntity, Book, NewBook},
    repository::BookRepository,
    services::{Auditor, ServiceError},
};

#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookRepository>,
    audit: Auditor,
}

impl BookService {
    pub fn new(books: Arc<dyn BookRepository>, audit: Auditor) -> Self {
        Self { books, audit }
    }

    pub async fn create(&self, book: NewBook) -> Result<i64, ServiceError> {
        let book_id = self.books.create_book(book).await?;

        tracing::info!(book_id, "Book created");
        self.audit
            .record(AuditAction::Create, AuditEntity::Book, book_id, "books.create");

        Ok(book_id)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Book, ServiceError> {
        let book = self
            .books
            .get_book(id)
            .await?
            .ok_or(ServiceError::BookNotFound)?;

        self.audit
            .record(AuditAction::Get, AuditEntity::Book, id, "books.get_by_id");

        Ok(book)
    }

    pub async fn list(&self) -> Result<Vec<Book>, ServiceError> {
        let books = self.books.list_books().await?;

        self.audit
            .record(AuditAction::Get, AuditEntity::Book, 0, "books.list");

        Ok(books)
    }

    pub async fn update(&self, id: i64, book: NewBook) -> Result<(), ServiceError> {
        if !self.books.update_book(id, book).await? {
            return Err(ServiceError::BookNotFound);
        }

        tracing::info!(book_id = id, "Book updated");
        self.audit
            .record(AuditAction::Update, AuditEntity::Book, id, "books.update");

        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.books.delete_book(id).await? {
            return Err(ServiceError::BookNotFound);
        }

        tracing::info!(book_id = id, "Book deleted");
        self.audit
            .record(AuditAction::Delete, AuditEntity::Book, id, "books.delete");

        Ok(())
    }
}
