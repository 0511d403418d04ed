//! Borrowing endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::borrow_record::{BorrowRecord, BorrowRecordDetails},
    AppState,
};

/// Member and book of a borrow or return
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorrowRequest {
    pub member_id: i64,
    pub book_id: i64,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowRecord),
        (status = 404, description = "Member or book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Book is not available", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowRecord>)> {
    let record = state
        .services
        .borrows
        .borrow(request.member_id, request.book_id)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/return",
    tag = "borrows",
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Book returned", body = BorrowRecord),
        (status = 404, description = "No active borrow record found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Json(request): Json<BorrowRequest>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state
        .services
        .borrows
        .return_book(request.member_id, request.book_id)
        .await?;
    Ok(Json(record))
}

/// Borrow history, most recent first
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    responses(
        (status = 200, description = "Borrow history", body = Vec<BorrowRecordDetails>)
    )
)]
pub async fn borrow_history(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BorrowRecordDetails>>> {
    let history = state.services.borrows.history().await?;
    Ok(Json(history))
}
