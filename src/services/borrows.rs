//! Borrowing service
//!
//! A book is either `AVAILABLE` or `BORROWED`. Borrowing moves it to
//! `BORROWED` and opens a record; returning closes the record opened by the
//! same member and moves the book back to `AVAILABLE`.

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::borrow_record::{BorrowRecord, BorrowRecordDetails},
    repository::Repository,
};

use super::clock::Clock;

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    clock: Arc<dyn Clock>,
}

impl BorrowsService {
    pub fn new(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Borrow a book for a member
    pub async fn borrow(&self, member_id: i64, book_id: i64) -> AppResult<BorrowRecord> {
        let record = self
            .repository
            .borrows
            .borrow(member_id, book_id, self.clock.now())
            .await?;
        tracing::info!(record_id = record.id, member_id, book_id, "Book borrowed");
        Ok(record)
    }

    /// Return a book previously borrowed by the same member
    pub async fn return_book(&self, member_id: i64, book_id: i64) -> AppResult<BorrowRecord> {
        let record = self
            .repository
            .borrows
            .return_book(member_id, book_id, self.clock.now())
            .await?;
        tracing::info!(record_id = record.id, member_id, book_id, "Book returned");
        Ok(record)
    }

    /// Every borrow record, most recent first
    pub async fn history(&self) -> AppResult<Vec<BorrowRecordDetails>> {
        self.repository.borrows.history().await
    }

    /// Outstanding borrow of a book
    pub async fn current_borrow(&self, book_id: i64) -> AppResult<Option<BorrowRecord>> {
        self.repository.borrows.find_active_for_book(book_id).await
    }

    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.borrows.count_active().await
    }
}
