//! Library statistics

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, AppState};

#[derive(Serialize, ToSchema)]
pub struct StatsResponse {
    pub books: i64,
    pub members: i64,
    /// Books currently out
    pub active_borrows: i64,
}

/// Catalog and lending counters
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Library statistics", body = StatsResponse)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<StatsResponse>> {
    Ok(Json(StatsResponse {
        books: state.services.books.count().await?,
        members: state.services.members.count().await?,
        active_borrows: state.services.borrows.count_active().await?,
    }))
}
