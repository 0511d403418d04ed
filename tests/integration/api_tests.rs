//! Router integration tests against an in-memory database

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use athenaeum_server::{
    create_router, db, repository::Repository, services::Services, AppState,
};

async fn app() -> (Router, Arc<Services>) {
    let pool = db::memory_pool().await.expect("in-memory database");
    let services = Arc::new(Services::new(Repository::new(pool)));
    let state = AppState {
        services: services.clone(),
    };
    (create_router(state), services)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("infallible")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app().await;

    let response = send(&app, get("/api/v1/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "healthy");

    let response = send(&app, get("/api/v1/ready")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ready");
}

#[tokio::test]
async fn test_root_redirects_to_employees() {
    let (app, _) = app().await;

    let response = send(&app, get("/")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/employees");
}

#[tokio::test]
async fn test_create_edit_and_delete_employee() {
    let (app, services) = app().await;

    let response = send(
        &app,
        post_form(
            "/employees",
            "id=&name=Sauron+the+Deceiver&email=sauron%40mordor.com&department=DARK_MAGIC&salary=999999.5",
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/employees");

    let employees = tokio_test::assert_ok!(services.employees.list().await);
    assert_eq!(employees.len(), 1);
    let id = employees[0].id;

    let page = body_text(send(&app, get("/employees")).await).await;
    assert!(page.contains("Sauron the Deceiver"));

    let response = send(&app, get(&format!("/employees/edit/{}", id))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("<h1>Edit Employee</h1>"));
    assert!(page.contains(r#"<option value="DARK_MAGIC" selected>"#));

    let response = send(&app, get(&format!("/employees/delete/{}", id))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(services.employees.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_invalid_employee_form_is_rerendered() {
    let (app, services) = app().await;

    let response = send(
        &app,
        post_form("/employees", "id=&name=X&email=not-an-email&department=&salary=-5"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Name must be between 2 and 100 characters"));
    assert!(page.contains("Please provide a valid email address"));
    assert!(page.contains("Department is required"));
    assert!(page.contains("Salary must be positive"));
    assert!(page.contains(r#"value="not-an-email""#));
    assert_eq!(services.employees.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_edit_unknown_employee_is_not_found() {
    let (app, _) = app().await;

    let response = send(&app, get("/employees/edit/42")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("Invalid employee Id: 42"));
}

#[tokio::test]
async fn test_borrow_flow() {
    let (app, _) = app().await;

    let response = send(
        &app,
        post_json(
            "/api/v1/books",
            json!({"isbn": "978-0132350884", "title": "Clean Code", "author": "Robert C. Martin"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let book_id = body_json(response).await["id"].as_i64().unwrap();

    let mut member_ids = Vec::new();
    for (name, email) in [("John Doe", "john.doe@example.com"), ("Jane Smith", "jane.smith@example.com")] {
        let response = send(
            &app,
            post_json("/api/v1/members", json!({"name": name, "email": email, "phone": "555-0101"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        member_ids.push(body_json(response).await["id"].as_i64().unwrap());
    }
    let (john, jane) = (member_ids[0], member_ids[1]);

    let response = send(
        &app,
        post_json("/api/v1/borrows", json!({"member_id": john, "book_id": book_id})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["return_date"].is_null());

    let book = body_json(send(&app, get(&format!("/api/v1/books/{}", book_id))).await).await;
    assert_eq!(book["available"], false);
    assert_eq!(book["current_borrow"]["member_id"], john);

    let response = send(
        &app,
        post_json("/api/v1/borrows", json!({"member_id": jane, "book_id": book_id})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["message"], "Book is not available");

    let response = send(
        &app,
        post_json("/api/v1/borrows/return", json!({"member_id": jane, "book_id": book_id})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "No active borrow record found");

    let response = send(
        &app,
        post_json("/api/v1/borrows/return", json!({"member_id": john, "book_id": book_id})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["return_date"].is_string());

    let history = body_json(send(&app, get("/api/v1/borrows")).await).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["member_name"], "John Doe");
    assert_eq!(history[0]["book_isbn"], "978-0132350884");

    let stats = body_json(send(&app, get("/api/v1/stats")).await).await;
    assert_eq!(stats, json!({"books": 1, "members": 2, "active_borrows": 0}));
}

#[tokio::test]
async fn test_borrow_unknown_member() {
    let (app, _) = app().await;

    let response = send(&app, post_json("/api/v1/borrows", json!({"member_id": 1, "book_id": 1}))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Member not found");
}

#[tokio::test]
async fn test_search_books_ignores_case() {
    let (app, services) = app().await;
    services
        .books
        .add_book("Clean Code", "Robert C. Martin", "978-0132350884")
        .await
        .unwrap();
    services
        .books
        .add_book("Refactoring", "Martin Fowler", "978-0134757599")
        .await
        .unwrap();

    let found = body_json(send(&app, get("/api/v1/books/search?q=MARTIN")).await).await;
    let titles: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Clean Code", "Refactoring"]);

    let found = body_json(send(&app, get("/api/v1/books/search?q=clean")).await).await;
    assert_eq!(found.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_created_book_is_always_available() {
    let (app, services) = app().await;
    let john = services
        .members
        .register("John Doe", "john.doe@example.com", "555-0101")
        .await
        .unwrap();

    let response = send(
        &app,
        post_json(
            "/api/v1/books",
            json!({
                "isbn": "978-0132350884",
                "title": "Clean Code",
                "author": "Robert C. Martin",
                "available": false
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let book = body_json(response).await;
    assert_eq!(book["available"], true);

    let response = send(
        &app,
        post_json("/api/v1/borrows", json!({"member_id": john.id, "book_id": book["id"]})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_duplicate_isbn_conflicts() {
    let (app, _) = app().await;
    let book = json!({"isbn": "978-0132350884", "title": "Clean Code", "author": "Robert C. Martin"});

    let first = send(&app, post_json("/api/v1/books", book.clone())).await;
    let second = send(&app, post_json("/api/v1/books", book)).await;

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_member_rejected() {
    let (app, _) = app().await;

    let response = send(
        &app,
        post_json("/api/v1/members", json!({"name": "", "email": "nope"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_book_is_not_found() {
    let (app, _) = app().await;

    let response = send(&app, get("/api/v1/books/7")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Book with id 7 not found");
}

#[tokio::test]
async fn test_openapi_document_lists_library_paths() {
    let (app, _) = app().await;

    let doc = body_json(send(&app, get("/api-docs/openapi.json")).await).await;

    assert!(doc["paths"]["/borrows"].is_object());
    assert!(doc["paths"]["/books/search"].is_object());
}
