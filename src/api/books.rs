//! Book endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ErrorResponse},
    models::book::{Book, BookPayload, BookQuery, BookShort},
    AppState,
};

use super::{ApiResponse, MessageResponse};

/// Identifier of a created or updated book
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

#[derive(Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookShort>,
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = ApiResponse<BookIdData>),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 500, description = "Book could not be stored", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookIdData>>)> {
    let Json(payload) = payload?;

    let book = state.services.books.create(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BookIdData { book_id: book.id }).with_message("Book added successfully")),
    ))
}

/// List books, optionally filtered. Never fails on the shape of the query
/// string: repeated keys keep their last value, unknown keys are ignored.
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = ApiResponse<BookListData>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<ApiResponse<BookListData>> {
    let query = BookQuery::from_pairs(pairs);

    let books = state.services.books.list(&query).await;
    Json(ApiResponse::success(BookListData { books }))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = ApiResponse<BookData>),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<BookData>>> {
    let book = state.services.books.get(&id).await?;
    Ok(Json(ApiResponse::success(BookData { book })))
}

/// Replace an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = ApiResponse<BookIdData>),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<Json<ApiResponse<BookIdData>>> {
    let Json(payload) = payload?;

    let book = state.services.books.update(&id, payload).await?;

    Ok(Json(
        ApiResponse::success(BookIdData { book_id: book.id }).with_message("Book updated successfully"),
    ))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(&id).await?;
    Ok(Json(MessageResponse::success("Book deleted successfully")))
}
