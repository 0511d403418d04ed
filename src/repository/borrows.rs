//! Borrow records repository: the book lending state machine

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::borrow_record::{
        to_epoch_millis, BorrowRecord, BorrowRecordDetails, BorrowRecordDetailsRow,
        BorrowRecordRow,
    },
};

pub const MEMBER_NOT_FOUND: &str = "Member not found";
pub const BOOK_NOT_FOUND: &str = "Book not found";
pub const BOOK_NOT_AVAILABLE: &str = "Book is not available";
pub const NO_ACTIVE_BORROW: &str = "No active borrow record found";

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Sqlite>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Lend a book to a member.
    ///
    /// The availability flag is claimed with a conditional update as the first
    /// statement of the transaction, so two concurrent borrows of the same book
    /// cannot both succeed. Errors are reported in the order: unknown member,
    /// unknown book, book already out.
    pub async fn borrow(
        &self,
        member_id: i64,
        book_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query("UPDATE books SET available = 0 WHERE id = ? AND available = 1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
            == 1;

        let member_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = ?)")
                .bind(member_id)
                .fetch_one(&mut *tx)
                .await?;

        if !member_exists {
            return Err(AppError::NotFound(MEMBER_NOT_FOUND.to_string()));
        }

        if !claimed {
            let book_exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
                    .bind(book_id)
                    .fetch_one(&mut *tx)
                    .await?;

            return Err(if book_exists {
                AppError::Conflict(BOOK_NOT_AVAILABLE.to_string())
            } else {
                AppError::NotFound(BOOK_NOT_FOUND.to_string())
            });
        }

        let row = sqlx::query_as::<_, BorrowRecordRow>(
            r#"
            INSERT INTO borrow_records (member_id, book_id, borrow_date, return_date)
            VALUES (?, ?, ?, NULL)
            RETURNING id, member_id, book_id, borrow_date, return_date
            "#,
        )
        .bind(member_id)
        .bind(book_id)
        .bind(to_epoch_millis(now))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::on_unique_violation(e, BOOK_NOT_AVAILABLE))?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Close the outstanding borrow of `book_id` by `member_id`.
    ///
    /// A book lent to somebody else, or not lent at all, is reported as
    /// `NotFound`.
    pub async fn return_book(
        &self,
        member_id: i64,
        book_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, BorrowRecordRow>(
            r#"
            UPDATE borrow_records
            SET return_date = ?
            WHERE member_id = ? AND book_id = ? AND return_date IS NULL
            RETURNING id, member_id, book_id, borrow_date, return_date
            "#,
        )
        .bind(to_epoch_millis(now))
        .bind(member_id)
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(NO_ACTIVE_BORROW.to_string()))?;

        sqlx::query("UPDATE books SET available = 1 WHERE id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Outstanding borrow of a book, if any
    pub async fn find_active_for_book(&self, book_id: i64) -> AppResult<Option<BorrowRecord>> {
        let row = sqlx::query_as::<_, BorrowRecordRow>(
            r#"
            SELECT id, member_id, book_id, borrow_date, return_date
            FROM borrow_records
            WHERE book_id = ? AND return_date IS NULL
            "#,
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    /// Full history, most recent borrow first
    pub async fn history(&self) -> AppResult<Vec<BorrowRecordDetails>> {
        let rows = sqlx::query_as::<_, BorrowRecordDetailsRow>(
            r#"
            SELECT r.id, r.member_id, m.name AS member_name,
                   r.book_id, b.isbn AS book_isbn, b.title AS book_title,
                   r.borrow_date, r.return_date
            FROM borrow_records r
            JOIN members m ON m.id = r.member_id
            JOIN books b ON b.id = r.book_id
            ORDER BY r.borrow_date DESC, r.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Count active borrows
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE return_date IS NULL")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
