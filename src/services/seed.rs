//! First-boot data: library import from `books.json` / `members.xml`, and
//! the randomly staffed employee directory.

use std::path::{Path, PathBuf};

use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::NewBook,
        employee::{Department, EmployeeInput},
        member::NewMember,
    },
};

use super::{books::BooksService, employees::EmployeesService, members::MembersService};

pub const BOOKS_FILE: &str = "books.json";
pub const MEMBERS_FILE: &str = "members.xml";

/// `<members><member>…</member></members>`
#[derive(Debug, Deserialize)]
struct MembersDocument {
    #[serde(rename = "member", default)]
    members: Vec<NewMember>,
}

/// What a loader run imported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub books: usize,
    pub members: usize,
    /// False when the tables already held data
    pub ran: bool,
}

/// Imports the bundled library data on first boot
pub struct DataLoader {
    books: BooksService,
    members: MembersService,
    data_dir: PathBuf,
}

impl DataLoader {
    pub fn new(books: BooksService, members: MembersService, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            books,
            members,
            data_dir: data_dir.into(),
        }
    }

    /// Import books then members, only when both tables are empty.
    /// A missing or malformed file is logged and skipped.
    pub async fn load_initial_data(&self) -> AppResult<LoadReport> {
        if self.books.count().await? > 0 || self.members.count().await? > 0 {
            tracing::info!("Database already contains data. Skipping initial data load.");
            return Ok(LoadReport::default());
        }

        tracing::info!("Database is empty. Loading initial data...");

        let books_file = self.data_dir.join(BOOKS_FILE);
        let books = match self.load_books(&books_file).await {
            Ok(n) => {
                tracing::info!("Successfully loaded {} books from {}", n, books_file.display());
                n
            }
            Err(e) => {
                tracing::error!("Error loading books: {}", e);
                0
            }
        };

        let members_file = self.data_dir.join(MEMBERS_FILE);
        let members = match self.load_members(&members_file).await {
            Ok(n) => {
                tracing::info!(
                    "Successfully loaded {} members from {}",
                    n,
                    members_file.display()
                );
                n
            }
            Err(e) => {
                tracing::error!("Error loading members: {}", e);
                0
            }
        };

        tracing::info!("Initial data loading completed.");

        Ok(LoadReport {
            books,
            members,
            ran: true,
        })
    }

    async fn load_books(&self, path: &Path) -> AppResult<usize> {
        let raw = tokio::fs::read_to_string(path).await?;
        let books: Vec<NewBook> = serde_json::from_str(&raw)
            .map_err(|e| AppError::BadRequest(format!("{}: {}", path.display(), e)))?;

        let mut loaded = 0;
        for book in books {
            let isbn = book.isbn.clone();
            match self.books.add(book).await {
                Ok(_) => loaded += 1,
                Err(e @ (AppError::Validation(_) | AppError::Conflict(_))) => {
                    tracing::warn!(isbn = %isbn, "Skipping book: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(loaded)
    }

    async fn load_members(&self, path: &Path) -> AppResult<usize> {
        let raw = tokio::fs::read_to_string(path).await?;
        let document: MembersDocument = quick_xml::de::from_str(&raw)
            .map_err(|e| AppError::BadRequest(format!("{}: {}", path.display(), e)))?;

        let mut loaded = 0;
        for member in document.members {
            let member = NewMember::new(&member.name, &member.email, &member.phone);
            let name = member.name.clone();
            match self.members.add(member).await {
                Ok(_) => loaded += 1,
                Err(e @ AppError::Validation(_)) => {
                    tracing::warn!(name = %name, "Skipping member: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(loaded)
    }
}

const VILLAIN_NAMES: [&str; 14] = [
    "Morgoth the Destroyer",
    "Sauron the Deceiver",
    "Azog the Defiler",
    "Gothmog the Balrog",
    "Shelob the Great",
    "Saruman the White",
    "The Witch-king of Angmar",
    "Glaurung the Deceiver",
    "Ungoliant the Dark",
    "Durin's Bane",
    "Smaug the Magnificent",
    "The Mouth of Sauron",
    "Bolg the Vengeful",
    "Gollum the Wretched",
];

const MIN_SALARY: f64 = 100_000.0;
const MAX_SALARY: f64 = 1_000_000.0;

/// `first word of the name`@mordor.com, letters and digits only
fn villain_email(name: &str) -> String {
    let local: String = name
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    format!("{}@mordor.com", local)
}

/// Distinct villains with a random department and a salary in
/// `[100_000, 1_000_000)`; at most as many as there are names.
pub fn random_staff<R: Rng>(rng: &mut R, count: usize) -> Vec<EmployeeInput> {
    let mut names = VILLAIN_NAMES.to_vec();
    names.shuffle(rng);

    names
        .into_iter()
        .take(count)
        .map(|name| {
            let salary: f64 = rng.gen_range(MIN_SALARY..MAX_SALARY);
            EmployeeInput {
                name: name.to_string(),
                email: villain_email(name),
                department: Department::ALL.choose(rng).copied(),
                salary: Some((salary * 100.0).round() / 100.0),
            }
        })
        .collect()
}

/// Staff the directory when it is empty; returns how many were created
pub async fn seed_employees(employees: &EmployeesService, count: usize) -> AppResult<usize> {
    if employees.count().await? > 0 {
        tracing::debug!("Employee directory already populated, not seeding");
        return Ok(0);
    }

    let staff = random_staff(&mut rand::thread_rng(), count);
    for input in &staff {
        employees.save(input, None).await?;
    }
    tracing::info!("Seeded {} employees", staff.len());
    Ok(staff.len())
}
