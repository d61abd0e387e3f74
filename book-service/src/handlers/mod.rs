//! HTTP handlers for book-service.

pub mod auth;
pub mod books;

pub use auth::{refresh, sign_in, sign_up, REFRESH_COOKIE};
pub use books::{create_book, delete_book, get_book, list_books, update_book};
