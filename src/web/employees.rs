//! Employee directory handlers

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::{
    models::employee::{EmployeeForm, FieldErrors},
    AppState,
};

use super::{html, PageResult};

/// List all employees
pub async fn list_employees(State(state): State<AppState>) -> PageResult<Html<String>> {
    let employees = state.services.employees.list().await?;
    Ok(Html(html::employee_list(&employees)))
}

/// Empty creation form
pub async fn new_employee_form() -> Html<String> {
    Html(html::employee_form(
        &EmployeeForm::default(),
        &FieldErrors::default(),
    ))
}

/// Form prefilled with an existing employee
pub async fn edit_employee_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> PageResult<Html<String>> {
    let employee = state.services.employees.get(id).await?;
    Ok(Html(html::employee_form(
        &EmployeeForm::from_employee(&employee),
        &FieldErrors::default(),
    )))
}

/// Create or update from the submitted form.
///
/// Invalid input re-renders the form with the submitted values and the
/// messages next to each field.
pub async fn save_employee(
    State(state): State<AppState>,
    Form(form): Form<EmployeeForm>,
) -> PageResult<Response> {
    let bound = form
        .employee_id()
        .and_then(|id| form.bind().map(|input| (id, input)));

    let (id, input) = match bound {
        Ok(ok) => ok,
        Err(errors) => {
            tracing::debug!(?errors, "Employee form rejected");
            return Ok(Html(html::employee_form(&form, &errors)).into_response());
        }
    };

    state.services.employees.save(&input, id).await?;
    Ok(Redirect::to("/employees").into_response())
}

/// Delete then go back to the list
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> PageResult<Redirect> {
    state.services.employees.delete(id).await?;
    Ok(Redirect::to("/employees"))
}
