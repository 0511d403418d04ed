//! Employee directory model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use std::str::FromStr;
use validator::Validate;

use crate::error::AppError;

// ---------------------------------------------------------------------------
// Department
// ---------------------------------------------------------------------------

/// Department of the overlord's organisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    DarkForces,
    EvilPlanning,
    MinionManagement,
    Corruption,
    Conquest,
    DarkMagic,
    Operations,
}

impl Department {
    pub const ALL: [Department; 7] = [
        Department::DarkForces,
        Department::EvilPlanning,
        Department::MinionManagement,
        Department::Corruption,
        Department::Conquest,
        Department::DarkMagic,
        Department::Operations,
    ];

    /// Code stored in the database and posted by forms
    pub fn code(&self) -> &'static str {
        match self {
            Department::DarkForces => "DARK_FORCES",
            Department::EvilPlanning => "EVIL_PLANNING",
            Department::MinionManagement => "MINION_MANAGEMENT",
            Department::Corruption => "CORRUPTION",
            Department::Conquest => "CONQUEST",
            Department::DarkMagic => "DARK_MAGIC",
            Department::Operations => "OPERATIONS",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Department::DarkForces => "Dark Forces",
            Department::EvilPlanning => "Evil Planning",
            Department::MinionManagement => "Minion Management",
            Department::Corruption => "Corruption",
            Department::Conquest => "Conquest",
            Department::DarkMagic => "Dark Magic",
            Department::Operations => "Operations",
        }
    }
}

impl FromStr for Department {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.code() == s)
            .ok_or_else(|| AppError::Validation(format!("Unknown department: {}", s)))
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Employee
// ---------------------------------------------------------------------------

/// Employee from database
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: Department,
    pub salary: f64,
}

/// Raw `employees` row
#[derive(Debug, FromRow)]
pub struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub salary: f64,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = AppError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let department = row.department.parse().map_err(|_| {
            AppError::Internal(format!(
                "Employee {} has unknown department {}",
                row.id, row.department
            ))
        })?;
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            department,
            salary: row.salary,
        })
    }
}

/// Validated employee fields, ready to be saved
#[derive(Debug, Clone, Validate)]
pub struct EmployeeInput {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(required(message = "Department is required"))]
    pub department: Option<Department>,
    #[validate(
        required(message = "Salary is required"),
        range(min = 0.0, message = "Salary must be positive")
    )]
    pub salary: Option<f64>,
}

// ---------------------------------------------------------------------------
// Form binding
// ---------------------------------------------------------------------------

/// Per-field error messages, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            for e in errs {
                match &e.message {
                    Some(msg) => out.add(&field, msg.to_string()),
                    None => out.add(&field, format!("{} is invalid", field)),
                }
            }
        }
        out
    }
}

/// Urlencoded employee form as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeForm {
    /// Hidden field, set when editing
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub salary: String,
}

impl EmployeeForm {
    /// Prefill the form from a stored employee
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            id: employee.id.to_string(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            department: employee.department.code().to_string(),
            salary: format!("{:.2}", employee.salary),
        }
    }

    /// Id of the employee being edited, if any
    pub fn employee_id(&self) -> Result<Option<i64>, FieldErrors> {
        let id = self.id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        id.parse().map(Some).map_err(|_| {
            let mut errors = FieldErrors::default();
            errors.add("id", "Invalid employee id");
            errors
        })
    }

    /// Bind the raw strings to a validated input, collecting every field error
    pub fn bind(&self) -> Result<EmployeeInput, FieldErrors> {
        let mut errors = FieldErrors::default();

        let department = match self.department.trim() {
            "" => None,
            code => match code.parse::<Department>() {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.add("department", "Unknown department");
                    None
                }
            },
        };

        let salary = match self.salary.trim() {
            "" => None,
            raw => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    errors.add("salary", "Salary must be a number");
                    None
                }
            },
        };

        let input = EmployeeInput {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            department,
            salary,
        };

        if input.name.is_empty() {
            errors.add("name", "Name is required");
        }
        if input.email.is_empty() {
            errors.add("email", "Email is required");
        }

        if let Err(validation) = input.validate() {
            let validation = FieldErrors::from(validation);
            for (field, messages) in validation.0 {
                // a parse error already explains a missing department/salary
                if matches!(field.as_str(), "department" | "salary")
                    && !errors.get(&field).is_empty()
                {
                    continue;
                }
                for message in messages {
                    errors.add(&field, message);
                }
            }
        }

        if errors.is_empty() {
            Ok(input)
        } else {
            Err(errors)
        }
    }
}
