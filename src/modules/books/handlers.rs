//! HTTP handlers for the books module.
//!
//! Extractor rejections on the id or the query string are answered as
//! "Book not found": an id that cannot be read matches no book.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use bookshelf_http::error::{AppError, MessageBody};

use super::models::{parse_id, Book, BookError, BookId, BookPatch, CreateBook, SearchParams};
use super::store::BookStore;

pub type SharedStore = Arc<BookStore>;

fn path_id(path: Result<Path<String>, PathRejection>) -> Result<BookId, BookError> {
    let Path(raw_id) = path.map_err(|_| BookError::NotFound)?;
    parse_id(&raw_id).ok_or(BookError::NotFound)
}

/// GET /books
pub async fn list_books(State(store): State<SharedStore>) -> Json<Vec<Book>> {
    Json(store.list().await)
}

/// GET /books/{id}
pub async fn get_book(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let id = path_id(path)?;
    let book = store.get(id).await.ok_or(BookError::NotFound)?;
    Ok(Json(book))
}

/// POST /books
pub async fn create_book(
    State(store): State<SharedStore>,
    body: Bytes,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let new_book = CreateBook::from_json(&body)?.validate()?;
    let book = store.create(new_book).await;

    tracing::info!(book_id = book.id, title = %book.title, "book created");
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /search?title=
pub async fn search_books(
    State(store): State<SharedStore>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Book>, AppError> {
    let Query(pairs) = query.map_err(|_| BookError::NotFound)?;
    let title = SearchParams::from_pairs(pairs)
        .title
        .ok_or(BookError::NotFound)?;
    let book = store
        .find_by_title(&title)
        .await
        .ok_or(BookError::NotFound)?;
    Ok(Json(book))
}

/// PUT /books/{id}
///
/// An unknown id is reported before the body is looked at.
pub async fn update_book(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<Book>, AppError> {
    let id = path_id(path)?;
    store.get(id).await.ok_or(BookError::NotFound)?;

    let patch = BookPatch::from_json(&body)?;
    let book = store.update(id, patch).await.ok_or(BookError::NotFound)?;

    tracing::info!(book_id = book.id, "book updated");
    Ok(Json(book))
}

/// DELETE /books/{id}
pub async fn delete_book(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageBody>, AppError> {
    let id = path_id(path)?;
    if !store.remove(id).await {
        return Err(BookError::NotFound.into());
    }

    tracing::info!(book_id = id, "book deleted");
    Ok(Json(MessageBody::new("Book deleted")))
}
