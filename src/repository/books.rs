//! In-memory book store

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::book::{generate_book_id, Book, BookPayload, BookQuery, BookShort},
};

/// Ordered collection of books, insertion order preserved.
#[derive(Debug, Default)]
pub struct BookCollection {
    books: Vec<Book>,
}

impl BookCollection {
    pub fn append(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Book> {
        self.books.get_mut(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Book {
        self.books.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Draw an id not used by any book in the collection.
    fn unused_id(&self) -> String {
        loop {
            let id = generate_book_id();
            if self.find_index_by_id(&id).is_none() {
                return id;
            }
        }
    }
}

/// Shared handle to the book store. Every method holds the lock for the
/// whole operation.
#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<BookCollection>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new book built from a validated payload
    pub async fn create(&self, payload: BookPayload) -> AppResult<Book> {
        let mut books = self.books.write().await;

        let id = books.unused_id();
        books.append(Book::new(id.clone(), payload));

        books
            .find_by_id(&id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Book {} missing after insert", id)))
    }

    /// Books matching the query, in store order
    pub async fn search(&self, query: &BookQuery) -> Vec<BookShort> {
        let books = self.books.read().await;
        books
            .iter()
            .filter(|book| query.matches(book))
            .map(BookShort::from)
            .collect()
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Book> {
        self.books.read().await.find_by_id(id).cloned()
    }

    /// Replace a book's editable fields in place; `None` when the id is unknown
    pub async fn update(&self, id: &str, payload: BookPayload) -> Option<Book> {
        let mut books = self.books.write().await;
        let index = books.find_index_by_id(id)?;
        let book = books.get_mut(index)?;
        book.apply(payload);
        Some(book.clone())
    }

    /// Remove a book; `None` when the id is unknown
    pub async fn delete(&self, id: &str) -> Option<Book> {
        let mut books = self.books.write().await;
        let index = books.find_index_by_id(id)?;
        Some(books.remove_at(index))
    }

    #[cfg(test)]
    pub async fn count(&self) -> usize {
        self.books.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, page_count: i64, read_page: i64, reading: bool) -> BookPayload {
        BookPayload {
            name: name.to_string(),
            publisher: format!("{} Press", name),
            page_count,
            read_page,
            reading,
            ..Default::default()
        }
    }

    #[test]
    fn test_collection_ops() {
        let mut books = BookCollection::default();
        assert!(books.is_empty());

        books.append(Book::new("a".into(), payload("Go", 10, 5, true)));
        books.append(Book::new("b".into(), payload("Rust", 10, 10, false)));

        assert_eq!(books.len(), 2);
        assert_eq!(books.find_index_by_id("b"), Some(1));
        assert_eq!(books.find_by_id("a").map(|b| b.name.as_str()), Some("Go"));
        assert!(books.find_by_id("c").is_none());

        let removed = books.remove_at(0);
        assert_eq!(removed.id, "a");
        assert_eq!(books.find_index_by_id("b"), Some(0));
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = BooksRepository::new();
        let created = repo.create(payload("Dune", 500, 500, false)).await.unwrap();

        assert_eq!(created.id.len(), 16);
        assert!(created.finished);
        assert_eq!(repo.get_by_id(&created.id).await, Some(created));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_search_preserves_order() {
        let repo = BooksRepository::new();
        let go = repo.create(payload("Go", 10, 5, true)).await.unwrap();
        let rust = repo.create(payload("Rust", 10, 10, false)).await.unwrap();

        let all = repo.search(&BookQuery::default()).await;
        let ids: Vec<_> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec![go.id.as_str(), rust.id.as_str()]);
        assert_eq!(all[0].publisher, "Go Press");

        let finished = repo
            .search(&BookQuery {
                finished: Some(true),
                ..Default::default()
            })
            .await;
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].id, rust.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = BooksRepository::new();
        let created = repo.create(payload("Dune", 100, 100, false)).await.unwrap();

        let updated = repo
            .update(&created.id, payload("Dune", 100, 50, true))
            .await
            .unwrap();
        assert!(!updated.finished);
        assert!(updated.reading);
        assert_eq!(updated.inserted_at, created.inserted_at);
        assert!(updated.updated_at > created.updated_at);

        assert!(repo.update("missing", payload("X", 1, 1, false)).await.is_none());

        assert!(repo.delete(&created.id).await.is_some());
        assert!(repo.delete(&created.id).await.is_none());
        assert_eq!(repo.count().await, 0);
    }
}
