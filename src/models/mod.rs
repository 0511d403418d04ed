//! Data models for Athenaeum

pub mod book;
pub mod borrow_record;
pub mod employee;
pub mod member;

// Re-export commonly used types
pub use book::{Book, BookState, NewBook};
pub use borrow_record::{BorrowRecord, BorrowRecordDetails};
pub use employee::{Department, Employee, EmployeeInput};
pub use member::{Member, NewMember};
