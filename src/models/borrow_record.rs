//! Borrow record model and epoch-millisecond timestamp handling

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Borrow record linking one member and one book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BorrowRecord {
    pub id: i64,
    pub member_id: i64,
    pub book_id: i64,
    pub borrow_date: DateTime<Utc>,
    /// `None` while the book is still out
    pub return_date: Option<DateTime<Utc>>,
}

impl BorrowRecord {
    pub fn is_outstanding(&self) -> bool {
        self.return_date.is_none()
    }
}

/// Borrow record joined with member and book for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BorrowRecordDetails {
    pub id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub book_id: i64,
    pub book_isbn: String,
    pub book_title: String,
    pub borrow_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
}

/// Raw `borrow_records` row, timestamps as stored
#[derive(Debug, FromRow)]
pub struct BorrowRecordRow {
    pub id: i64,
    pub member_id: i64,
    pub book_id: i64,
    pub borrow_date: i64,
    pub return_date: Option<i64>,
}

impl From<BorrowRecordRow> for BorrowRecord {
    fn from(row: BorrowRecordRow) -> Self {
        Self {
            id: row.id,
            member_id: row.member_id,
            book_id: row.book_id,
            borrow_date: from_epoch_millis(row.borrow_date),
            return_date: row.return_date.map(from_epoch_millis),
        }
    }
}

/// History row joined with member and book
#[derive(Debug, FromRow)]
pub struct BorrowRecordDetailsRow {
    pub id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub book_id: i64,
    pub book_isbn: String,
    pub book_title: String,
    pub borrow_date: i64,
    pub return_date: Option<i64>,
}

impl From<BorrowRecordDetailsRow> for BorrowRecordDetails {
    fn from(row: BorrowRecordDetailsRow) -> Self {
        Self {
            id: row.id,
            member_id: row.member_id,
            member_name: row.member_name,
            book_id: row.book_id,
            book_isbn: row.book_isbn,
            book_title: row.book_title,
            borrow_date: from_epoch_millis(row.borrow_date),
            return_date: row.return_date.map(from_epoch_millis),
        }
    }
}

/// Stored representation of a timestamp
pub fn to_epoch_millis(date: DateTime<Utc>) -> i64 {
    date.timestamp_millis()
}

pub fn from_epoch_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
