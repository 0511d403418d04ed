//! Business logic services

pub mod books;
pub mod borrows;
pub mod clock;
pub mod employees;
pub mod members;
pub mod seed;

use std::sync::Arc;

use crate::repository::Repository;

use clock::{Clock, SystemClock};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub members: members::MembersService,
    pub borrows: borrows::BorrowsService,
    pub employees: employees::EmployeesService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    /// Create all services, stamping borrows and returns with `clock`
    pub fn with_clock(repository: Repository, clock: Arc<dyn Clock>) -> Self {
        Self {
            books: books::BooksService::new(repository.clone()),
            members: members::MembersService::new(repository.clone()),
            borrows: borrows::BorrowsService::new(repository.clone(), clock),
            employees: employees::EmployeesService::new(repository.clone()),
            repository,
        }
    }

    /// Check the database answers
    pub async fn ping(&self) -> crate::AppResult<()> {
        self.repository.ping().await
    }
}
