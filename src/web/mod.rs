//! Server-rendered employee directory pages

pub mod employees;
pub mod html;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};

use crate::{error::AppError, AppState};

/// Routes of the employee directory
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/employees") }))
        .route("/employees", get(employees::list_employees))
        .route("/employees", post(employees::save_employee))
        .route("/employees/new", get(employees::new_employee_form))
        .route("/employees/edit/:id", get(employees::edit_employee_form))
        .route("/employees/delete/:id", get(employees::delete_employee))
        .with_state(state)
}

/// Application error rendered as an HTML page instead of JSON
#[derive(Debug)]
pub struct PageError(pub AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            other => {
                tracing::error!("Page error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };
        let title = status.canonical_reason().unwrap_or("Error");
        (status, Html(html::error_page(title, &message))).into_response()
    }
}

pub type PageResult<T> = Result<T, PageError>;
