//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload, BookQuery, BookShort},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate and store a new book
    pub async fn create(&self, payload: BookPayload) -> AppResult<Book> {
        payload
            .check()
            .map_err(|e| AppError::Validation(format!("Failed to add book. {}", e)))?;

        let book = self
            .repository
            .books
            .create(payload)
            .await
            .map_err(|e| {
                tracing::debug!("Book insert not visible in store: {}", e);
                AppError::Internal("Failed to add book".to_string())
            })?;

        tracing::debug!("Created book id={}", book.id);
        Ok(book)
    }

    /// List books matching the query filters
    pub async fn list(&self, query: &BookQuery) -> Vec<BookShort> {
        self.repository.books.search(query).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Replace a book. The payload is validated before the id is looked up.
    pub async fn update(&self, id: &str, payload: BookPayload) -> AppResult<Book> {
        payload
            .check()
            .map_err(|e| AppError::Validation(format!("Failed to update book. {}", e)))?;

        let book = self
            .repository
            .books
            .update(id, payload)
            .await
            .ok_or_else(|| AppError::NotFound("Failed to update book. Id not found".to_string()))?;

        tracing::debug!("Updated book id={}", book.id);
        Ok(book)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let book = self
            .repository
            .books
            .delete(id)
            .await
            .ok_or_else(|| AppError::NotFound("Failed to delete book. Id not found".to_string()))?;

        tracing::debug!("Deleted book id={}", book.id);
        Ok(())
    }
}
