//! Employees repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::employee::{Department, Employee, EmployeeRow},
};

#[derive(Clone)]
pub struct EmployeesRepository {
    pool: Pool<Sqlite>,
}

impl EmployeesRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, name, email, department, salary FROM employees ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Employee::try_from).collect()
    }

    /// Get employee by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Employee> {
        sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, name, email, department, salary FROM employees WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invalid employee Id: {}", id)))?
        .try_into()
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        department: Department,
        salary: f64,
    ) -> AppResult<Employee> {
        sqlx::query_as::<_, EmployeeRow>(
            r#"
            INSERT INTO employees (name, email, department, salary)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, email, department, salary
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(department.code())
        .bind(salary)
        .fetch_one(&self.pool)
        .await?
        .try_into()
    }

    pub async fn update(
        &self,
        id: i64,
        name: &str,
        email: &str,
        department: Department,
        salary: f64,
    ) -> AppResult<Employee> {
        sqlx::query_as::<_, EmployeeRow>(
            r#"
            UPDATE employees
            SET name = ?, email = ?, department = ?, salary = ?
            WHERE id = ?
            RETURNING id, name, email, department, salary
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(department.code())
        .bind(salary)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Invalid employee Id: {}", id)))?
        .try_into()
    }

    /// Delete employee; deleting an unknown id is a no-op
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
