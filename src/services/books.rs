//! Book catalog service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
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

    /// Add an available book with no genre
    pub async fn add_book(&self, title: &str, author: &str, isbn: &str) -> AppResult<Book> {
        self.add(NewBook::new(title, author, isbn)).await
    }

    pub async fn add(&self, book: NewBook) -> AppResult<Book> {
        book.validate()?;
        let book = self.repository.books.create(&book).await?;
        tracing::info!(book_id = book.id, isbn = %book.isbn, "Book added");
        Ok(book)
    }

    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        self.repository.books.find_by_isbn(isbn.trim()).await
    }

    /// Books whose title or author contains `query`, ignoring case
    pub async fn search(&self, query: &str) -> AppResult<Vec<Book>> {
        self.repository.books.search(query.trim()).await
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.repository.books.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn service() -> BooksService {
        BooksService::new(Repository::new(db::memory_pool().await.unwrap()))
    }

    #[tokio::test]
    async fn test_add_book_is_available() {
        let books = service().await;

        let book = books
            .add_book(" Clean Code ", "Robert C. Martin", "978-0132350884")
            .await
            .unwrap();

        assert_eq!(book.title, "Clean Code");
        assert!(book.available);
        assert_eq!(book.genre, None);
        assert_eq!(books.get(book.id).await.unwrap(), book);
    }

    #[tokio::test]
    async fn test_duplicate_isbn_conflicts() {
        let books = service().await;
        books
            .add_book("Clean Code", "Robert C. Martin", "978-0132350884")
            .await
            .unwrap();

        let err = books
            .add_book("Clean Code", "Someone Else", "978-0132350884")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(books.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_invalid_book_rejected() {
        let books = service().await;

        let err = books.add_book("", "Nobody", "not-an-isbn").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_search_matches_title_or_author_ignoring_case() {
        let books = service().await;
        books
            .add_book("Clean Code", "Robert C. Martin", "978-0132350884")
            .await
            .unwrap();
        books
            .add_book("Refactoring", "Martin Fowler", "978-0134757599")
            .await
            .unwrap();
        books
            .add_book("The Pragmatic Programmer", "Andrew Hunt", "978-0135957059")
            .await
            .unwrap();

        let titles = |found: Vec<Book>| found.into_iter().map(|b| b.title).collect::<Vec<_>>();

        assert_eq!(
            titles(books.search("mArTiN").await.unwrap()),
            ["Clean Code", "Refactoring"]
        );
        assert_eq!(titles(books.search("  pragmatic ").await.unwrap()), ["The Pragmatic Programmer"]);
        assert!(books.search("tolkien").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_book() {
        let books = service().await;

        let err = books.get(42).await.unwrap_err();

        assert_eq!(err.to_string(), "Book with id 42 not found");
        assert_eq!(books.get_by_isbn("978-0132350884").await.unwrap(), None);
    }
}
