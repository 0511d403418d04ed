//! JSON API handlers for the library

pub mod books;
pub mod borrows;
pub mod health;
pub mod members;
pub mod openapi;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Routes mounted under `/api/v1`
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books))
        .route("/books", post(books::create_book))
        .route("/books/search", get(books::search_books))
        .route("/books/:id", get(books::get_book))
        // Members
        .route("/members", get(members::list_members))
        .route("/members", post(members::create_member))
        .route("/members/:id", get(members::get_member))
        // Borrows
        .route("/borrows", get(borrows::borrow_history))
        .route("/borrows", post(borrows::borrow_book))
        .route("/borrows/return", post(borrows::return_book))
        // Statistics
        .route("/stats", get(stats::get_stats))
        .with_state(state)
}
