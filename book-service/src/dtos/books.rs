use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::NewBook;

const PUBLISH_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    #[schema(example = "Dune")]
    pub title: String,

    #[validate(length(min = 1, max = 255, message = "author must be 1-255 characters"))]
    #[schema(example = "Frank Herbert")]
    pub author: String,

    /// `YYYY-MM-DD`; defaults to the current time when omitted or empty.
    #[serde(default, deserialize_with = "deserialize_publish_date")]
    #[schema(value_type = Option<String>, format = Date, example = "1965-08-01")]
    pub publish_date: Option<NaiveDate>,

    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    #[schema(example = "Dune Messiah")]
    pub title: String,

    #[validate(length(min = 1, max = 255, message = "author must be 1-255 characters"))]
    #[schema(example = "Frank Herbert")]
    pub author: String,

    #[serde(default, deserialize_with = "deserialize_publish_date")]
    #[schema(value_type = Option<String>, format = Date, example = "1969-10-01")]
    pub publish_date: Option<NaiveDate>,

    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    #[schema(example = 4, minimum = 1, maximum = 5)]
    pub rating: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookWriteResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Book created successfully")]
    pub message: String,
}

impl CreateBookRequest {
    pub fn into_new_book(self) -> NewBook {
        new_book(self.title, self.author, self.publish_date, self.rating)
    }
}

impl UpdateBookRequest {
    pub fn into_new_book(self) -> NewBook {
        new_book(self.title, self.author, self.publish_date, self.rating)
    }
}

fn new_book(title: String, author: String, publish_date: Option<NaiveDate>, rating: i32) -> NewBook {
    NewBook {
        title,
        author,
        publish_date: publish_date
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
            .unwrap_or_else(Utc::now),
        rating,
    }
}

fn deserialize_publish_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, PUBLISH_DATE_FORMAT)
            .map(Some)
            .map_err(|e| {
                serde::de::Error::custom(format!(
                    "publish_date must be YYYY-MM-DD, got '{}': {}",
                    value, e
                ))
            }),
    }
}
