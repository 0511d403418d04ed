//! Book model and related types

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// ISBN-10 or ISBN-13, optionally grouped with hyphens or spaces
static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9][0-9\- ]{8,15}[0-9Xx]$").expect("valid ISBN pattern"));

/// Book from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    /// Business key
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    /// Whether the book can currently be borrowed
    pub available: bool,
}

/// Lending state derived from the availability flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookState {
    Available,
    Borrowed,
}

impl Book {
    pub fn state(&self) -> BookState {
        if self.available {
            BookState::Available
        } else {
            BookState::Borrowed
        }
    }
}

impl std::fmt::Display for BookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookState::Available => write!(f, "Available"),
            BookState::Borrowed => write!(f, "Borrowed"),
        }
    }
}

/// Book to insert, as typed at the console, posted to the API or read from `books.json`.
///
/// New books always start available; an `available` key in the input is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewBook {
    #[validate(regex(path = *ISBN_RE, message = "ISBN must contain 10 or 13 digits"))]
    pub isbn: String,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "Author is required"))]
    pub author: String,
    #[serde(default)]
    pub genre: Option<String>,
}

impl NewBook {
    pub fn new(title: &str, author: &str, isbn: &str) -> Self {
        Self {
            isbn: isbn.trim().to_string(),
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            genre: None,
        }
    }
}

/// Search query for books
#[derive(Debug, Deserialize, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive fragment of the title or author
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn_shapes() {
        assert!(NewBook::new("Clean Code", "Robert C. Martin", "978-0132350884")
            .validate()
            .is_ok());
        assert!(NewBook::new("Dune", "Frank Herbert", "0-441-17271-7").validate().is_ok());
        assert!(NewBook::new("Dune", "Frank Herbert", "not an isbn").validate().is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let errors = NewBook::new("  ", "Someone", "9780132350884")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_json_defaults() {
        let book: NewBook = serde_json::from_str(
            r#"{"isbn":"978-0132350884","title":"Clean Code","author":"Robert C. Martin","available":false}"#,
        )
        .unwrap();
        assert_eq!(book.isbn, "978-0132350884");
        assert_eq!(book.genre, None);
    }

    #[test]
    fn test_state_follows_availability() {
        let mut book = Book {
            id: 1,
            isbn: "978-0132350884".into(),
            title: "Clean Code".into(),
            author: "Robert C. Martin".into(),
            genre: None,
            available: true,
        };
        assert_eq!(book.state(), BookState::Available);
        book.available = false;
        assert_eq!(book.state(), BookState::Borrowed);
    }
}
