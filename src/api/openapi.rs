//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, borrows, health, members, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Athenaeum API",
        version = "1.0.0",
        description = "Library lending REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::search_books,
        books::get_book,
        books::create_book,
        // Members
        members::list_members,
        members::get_member,
        members::create_member,
        // Borrows
        borrows::borrow_book,
        borrows::return_book,
        borrows::borrow_history,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            crate::models::book::Book,
            crate::models::book::BookState,
            crate::models::book::NewBook,
            books::BookDetails,
            crate::models::member::Member,
            crate::models::member::NewMember,
            crate::models::borrow_record::BorrowRecord,
            crate::models::borrow_record::BorrowRecordDetails,
            borrows::BorrowRequest,
            stats::StatsResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "members", description = "Library members"),
        (name = "borrows", description = "Borrowing and returns"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
