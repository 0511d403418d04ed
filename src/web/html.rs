//! HTML rendering for the employee pages

use std::fmt::Write;

use crate::models::employee::{Department, Employee, EmployeeForm, FieldErrors};

/// Escape text for element content and quoted attribute values
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Evil Overlord HR</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; background: #1b1b1b; color: #eee; }}
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #555; padding: .4rem .8rem; }}
a {{ color: #e55; }}
.error {{ color: #f66; font-size: .9em; }}
</style>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

pub fn employee_list(employees: &[Employee]) -> String {
    let mut body = String::from(
        r#"<p><a href="/employees/new">Add employee</a></p>
<table>
<thead><tr><th>Name</th><th>Email</th><th>Department</th><th>Salary</th><th></th></tr></thead>
<tbody>
"#,
    );

    if employees.is_empty() {
        body.push_str("<tr><td colspan=\"5\">No employees yet.</td></tr>\n");
    }
    for e in employees {
        let _ = writeln!(
            body,
            r#"<tr><td>{name}</td><td>{email}</td><td>{department}</td><td>{salary:.2}</td><td><a href="/employees/edit/{id}">Edit</a> <a href="/employees/delete/{id}">Delete</a></td></tr>"#,
            name = escape(&e.name),
            email = escape(&e.email),
            department = escape(e.department.display_name()),
            salary = e.salary,
            id = e.id,
        );
    }
    body.push_str("</tbody>\n</table>\n");

    layout("Employees", &body)
}

fn field_errors(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .iter()
        .map(|msg| format!(r#"<div class="error">{}</div>"#, escape(msg)))
        .collect()
}

pub fn employee_form(form: &EmployeeForm, errors: &FieldErrors) -> String {
    let title = if form.id.trim().is_empty() {
        "New Employee"
    } else {
        "Edit Employee"
    };

    let mut options = String::from(r#"<option value="">-- Select department --</option>"#);
    for d in Department::ALL {
        let selected = if form.department == d.code() { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{code}"{selected}>{name}</option>"#,
            code = d.code(),
            selected = selected,
            name = escape(d.display_name()),
        );
    }

    let body = format!(
        r#"<form method="post" action="/employees">
<input type="hidden" name="id" value="{id}">
{id_errors}
<p><label>Name <input type="text" name="name" value="{name}"></label>{name_errors}</p>
<p><label>Email <input type="text" name="email" value="{email}"></label>{email_errors}</p>
<p><label>Department <select name="department">{options}</select></label>{department_errors}</p>
<p><label>Salary <input type="text" name="salary" value="{salary}"></label>{salary_errors}</p>
<p><button type="submit">Save</button> <a href="/employees">Cancel</a></p>
</form>
"#,
        id = escape(&form.id),
        id_errors = field_errors(errors, "id"),
        name = escape(&form.name),
        name_errors = field_errors(errors, "name"),
        email = escape(&form.email),
        email_errors = field_errors(errors, "email"),
        options = options,
        department_errors = field_errors(errors, "department"),
        salary = escape(&form.salary),
        salary_errors = field_errors(errors, "salary"),
    );

    layout(title, &body)
}

pub fn error_page(title: &str, message: &str) -> String {
    let body = format!(
        r#"<p class="error">{}</p>
<p><a href="/employees">Back to employees</a></p>
"#,
        escape(message)
    );
    layout(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("Durin's Bane & co")</script>"#),
            "&lt;script&gt;alert(&quot;Durin&#39;s Bane &amp; co&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_list_escapes_names() {
        let page = employee_list(&[Employee {
            id: 3,
            name: "Durin's Bane".into(),
            email: "durins@mordor.com".into(),
            department: Department::DarkMagic,
            salary: 123_456.789,
        }]);
        assert!(page.contains("Durin&#39;s Bane"));
        assert!(page.contains("Dark Magic"));
        assert!(page.contains("123456.79"));
        assert!(page.contains(r#"href="/employees/edit/3""#));
    }

    #[test]
    fn test_form_marks_selected_department_and_errors() {
        let form = EmployeeForm {
            department: "CONQUEST".into(),
            ..Default::default()
        };
        let mut errors = FieldErrors::default();
        errors.add("name", "Name must be between 2 and 100 characters");

        let page = employee_form(&form, &errors);

        assert!(page.contains(r#"<option value="CONQUEST" selected>Conquest</option>"#));
        assert!(page.contains("Name must be between 2 and 100 characters"));
        assert!(page.contains("<h1>New Employee</h1>"));
    }
}
