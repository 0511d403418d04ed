//! Employee directory service

use crate::{
    error::{AppError, AppResult},
    models::employee::{Employee, EmployeeInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct EmployeesService {
    repository: Repository,
}

impl EmployeesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Employee>> {
        self.repository.employees.list().await
    }

    pub async fn get(&self, id: i64) -> AppResult<Employee> {
        self.repository.employees.get_by_id(id).await
    }

    /// Create the employee, or overwrite employee `id` when given
    pub async fn save(&self, input: &EmployeeInput, id: Option<i64>) -> AppResult<Employee> {
        let (Some(department), Some(salary)) = (input.department, input.salary) else {
            return Err(AppError::Validation(
                "Department and salary are required".to_string(),
            ));
        };

        let employee = match id {
            Some(id) => {
                self.repository
                    .employees
                    .update(id, &input.name, &input.email, department, salary)
                    .await?
            }
            None => {
                self.repository
                    .employees
                    .create(&input.name, &input.email, department, salary)
                    .await?
            }
        };
        tracing::info!(employee_id = employee.id, updated = id.is_some(), "Employee saved");
        Ok(employee)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repository.employees.delete(id).await? {
            tracing::debug!(employee_id = id, "Delete of unknown employee ignored");
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        self.repository.employees.count().await
    }
}
