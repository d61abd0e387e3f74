//! Book model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Stored book record, also the API representation.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct Book {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Dune")]
    pub title: String,
    #[schema(example = "Frank Herbert")]
    pub author: String,
    pub publish_date: DateTime<Utc>,
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
}

/// Book fields as written by create and update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publish_date: DateTime<Utc>,
    pub rating: i32,
}

impl NewBook {
    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            publish_date: self.publish_date,
            rating: self.rating,
        }
    }
}
