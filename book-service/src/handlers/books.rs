use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::books::{BookWriteResponse, CreateBookRequest, UpdateBookRequest},
    middleware::AuthUser,
    utils::ValidatedJson,
    AppState,
};

fn parse_book_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("invalid book id")))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = BookWriteResponse),
        (status = 400, description = "Invalid body or validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
pub async fn create_book(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = state.book_service.create(req.into_new_book()).await?;
    tracing::debug!(user_id = user.user_id, book_id = id, "Book created by user");

    Ok((
        StatusCode::CREATED,
        Json(BookWriteResponse {
            id,
            message: "Book created successfully".to_string(),
        }),
    ))
}

/// Get a book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 400, description = "Invalid book id", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_book_id(&id)?;
    let book = state.book_service.get_by_id(id).await?;
    Ok(Json(book))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "All books ordered by id", body = [Book]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
pub async fn list_books(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let books = state.book_service.list().await?;
    Ok(Json(books))
}

/// Replace a book's fields
#[utoipa::path(
    put,
    path = "/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated", body = BookWriteResponse),
        (status = 400, description = "Invalid id, body or validation error", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateBookRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_book_id(&id)?;
    state.book_service.update(id, req.into_new_book()).await?;

    Ok(Json(BookWriteResponse {
        id,
        message: "Book updated successfully".to_string(),
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    params(("id" = i64, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Invalid book id", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    ),
    tag = "Books",
    security(("bearer_auth" = []))
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_book_id(&id)?;
    state.book_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_ids_must_be_integers() {
        assert_eq!(parse_book_id("42").unwrap(), 42);
        assert!(parse_book_id("abc").is_err());
        assert!(parse_book_id("").is_err());
    }
}
