//! Interactive text menu for the library

use chrono::{DateTime, Local, Utc};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    error::AppResult,
    models::Book,
    services::Services,
};

const INVALID_CHOICE: &str = "Invalid choice. Please try again.";

/// Console front-end over the library services.
///
/// Reads one line per prompt from `input`; end of input leaves every menu.
pub struct LibraryConsole<R, W> {
    services: Services,
    input: R,
    output: W,
}

impl<R, W> LibraryConsole<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(services: Services, input: R, output: W) -> Self {
        Self {
            services,
            input,
            output,
        }
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the main menu until the user exits or input ends
    pub async fn run(&mut self) -> AppResult<()> {
        loop {
            self.say("\n=== Library Management System ===").await?;
            self.say("1. Book Management").await?;
            self.say("2. Member Management").await?;
            self.say("3. Borrowing System").await?;
            self.say("0. Exit").await?;

            let Some(choice) = self.read_number("Enter your choice: ").await? else {
                break;
            };
            let keep_going = match choice {
                1 => self.book_menu().await?,
                2 => self.member_menu().await?,
                3 => self.borrow_menu().await?,
                0 => break,
                _ => {
                    self.say(INVALID_CHOICE).await?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }
        self.say("Goodbye!").await?;
        Ok(())
    }

    /// Returns false when input ended inside the menu
    async fn book_menu(&mut self) -> AppResult<bool> {
        loop {
            self.say("\n=== Book Management ===").await?;
            self.say("1. Add Book").await?;
            self.say("2. View All Books").await?;
            self.say("3. Search Books").await?;
            self.say("0. Back to Main Menu").await?;

            let Some(choice) = self.read_number("Enter your choice: ").await? else {
                return Ok(false);
            };
            let done = match choice {
                1 => self.add_book().await?,
                2 => self.view_all_books().await?,
                3 => self.search_books().await?,
                0 => return Ok(true),
                _ => {
                    self.say(INVALID_CHOICE).await?;
                    true
                }
            };
            if !done {
                return Ok(false);
            }
        }
    }

    async fn member_menu(&mut self) -> AppResult<bool> {
        loop {
            self.say("\n=== Member Management ===").await?;
            self.say("1. Register New Member").await?;
            self.say("2. View All Members").await?;
            self.say("0. Back to Main Menu").await?;

            let Some(choice) = self.read_number("Enter your choice: ").await? else {
                return Ok(false);
            };
            let done = match choice {
                1 => self.register_member().await?,
                2 => self.view_all_members().await?,
                0 => return Ok(true),
                _ => {
                    self.say(INVALID_CHOICE).await?;
                    true
                }
            };
            if !done {
                return Ok(false);
            }
        }
    }

    async fn borrow_menu(&mut self) -> AppResult<bool> {
        loop {
            self.say("\n=== Borrowing System ===").await?;
            self.say("1. Borrow Book").await?;
            self.say("2. Return Book").await?;
            self.say("3. View Borrow History").await?;
            self.say("0. Back to Main Menu").await?;

            let Some(choice) = self.read_number("Enter your choice: ").await? else {
                return Ok(false);
            };
            let done = match choice {
                1 => self.borrow_book().await?,
                2 => self.return_book().await?,
                3 => self.view_borrow_history().await?,
                0 => return Ok(true),
                _ => {
                    self.say(INVALID_CHOICE).await?;
                    true
                }
            };
            if !done {
                return Ok(false);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Books
    // -----------------------------------------------------------------------

    async fn add_book(&mut self) -> AppResult<bool> {
        self.say("\n=== Add New Book ===").await?;
        let Some(title) = self.read_line("Enter book title: ").await? else {
            return Ok(false);
        };
        let Some(author) = self.read_line("Enter author name: ").await? else {
            return Ok(false);
        };
        let Some(isbn) = self.read_line("Enter ISBN: ").await? else {
            return Ok(false);
        };

        match self.services.books.add_book(&title, &author, &isbn).await {
            Ok(book) => {
                self.say(&format!("Book added successfully! (ID: {})", book.id))
                    .await?
            }
            Err(e) => self.say(&format!("Error adding book: {}", e)).await?,
        }
        Ok(true)
    }

    async fn view_all_books(&mut self) -> AppResult<bool> {
        self.say("\n=== All Books ===").await?;
        match self.services.books.list().await {
            Ok(books) => self.print_books(&books).await?,
            Err(e) => self.say(&format!("Error listing books: {}", e)).await?,
        }
        Ok(true)
    }

    async fn search_books(&mut self) -> AppResult<bool> {
        self.say("\n=== Search Books ===").await?;
        let Some(query) = self.read_line("Enter search term (title/author): ").await? else {
            return Ok(false);
        };
        match self.services.books.search(&query).await {
            Ok(books) if books.is_empty() => self.say("No books found.").await?,
            Ok(books) => self.print_books(&books).await?,
            Err(e) => self.say(&format!("Error searching books: {}", e)).await?,
        }
        Ok(true)
    }

    async fn print_books(&mut self, books: &[Book]) -> AppResult<()> {
        for book in books {
            self.say(&format!(
                "ID: {} | ISBN: {} | Title: {} | Author: {} | Status: {}",
                book.id,
                book.isbn,
                book.title,
                book.author,
                book.state()
            ))
            .await?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Members
    // -----------------------------------------------------------------------

    async fn register_member(&mut self) -> AppResult<bool> {
        self.say("\n=== Register New Member ===").await?;
        let Some(name) = self.read_line("Enter member name: ").await? else {
            return Ok(false);
        };
        let Some(email) = self.read_line("Enter email: ").await? else {
            return Ok(false);
        };
        let Some(phone) = self.read_line("Enter phone number: ").await? else {
            return Ok(false);
        };

        match self.services.members.register(&name, &email, &phone).await {
            Ok(member) => {
                self.say(&format!("Member registered successfully! (ID: {})", member.id))
                    .await?
            }
            Err(e) => self.say(&format!("Error registering member: {}", e)).await?,
        }
        Ok(true)
    }

    async fn view_all_members(&mut self) -> AppResult<bool> {
        self.say("\n=== All Members ===").await?;
        match self.services.members.list().await {
            Ok(members) => {
                for member in members {
                    self.say(&format!(
                        "ID: {} | Name: {} | Email: {} | Phone: {}",
                        member.id, member.name, member.email, member.phone
                    ))
                    .await?;
                }
            }
            Err(e) => self.say(&format!("Error listing members: {}", e)).await?,
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Borrowing
    // -----------------------------------------------------------------------

    async fn borrow_book(&mut self) -> AppResult<bool> {
        self.say("\n=== Borrow Book ===").await?;
        let Some(member_id) = self.read_number("Enter member ID: ").await? else {
            return Ok(false);
        };
        let Some(book_id) = self.read_number("Enter book ID: ").await? else {
            return Ok(false);
        };

        match self.services.borrows.borrow(member_id, book_id).await {
            Ok(_) => self.say("Book borrowed successfully!").await?,
            Err(e) => self.say(&format!("Error borrowing book: {}", e)).await?,
        }
        Ok(true)
    }

    async fn return_book(&mut self) -> AppResult<bool> {
        self.say("\n=== Return Book ===").await?;
        let Some(member_id) = self.read_number("Enter member ID: ").await? else {
            return Ok(false);
        };
        let Some(book_id) = self.read_number("Enter book ID: ").await? else {
            return Ok(false);
        };

        match self.services.borrows.return_book(member_id, book_id).await {
            Ok(_) => self.say("Book returned successfully!").await?,
            Err(e) => self.say(&format!("Error returning book: {}", e)).await?,
        }
        Ok(true)
    }

    async fn view_borrow_history(&mut self) -> AppResult<bool> {
        self.say("\n=== Borrow History ===").await?;
        match self.services.borrows.history().await {
            Ok(records) => {
                for record in records {
                    let returned = record
                        .return_date
                        .map(format_date)
                        .unwrap_or_else(|| "Not returned".to_string());
                    self.say(&format!(
                        "Member ID: {} | Book ISBN: {} | Borrowed: {} | Returned: {}",
                        record.member_id,
                        record.book_isbn,
                        format_date(record.borrow_date),
                        returned
                    ))
                    .await?;
                }
            }
            Err(e) => self.say(&format!("Error loading history: {}", e)).await?,
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Input / output
    // -----------------------------------------------------------------------

    async fn say(&mut self, line: &str) -> AppResult<()> {
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }

    /// Prompt and read a trimmed line; `None` at end of input
    async fn read_line(&mut self, prompt: &str) -> AppResult<Option<String>> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.flush().await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt until the reply parses as a number; `None` at end of input
    async fn read_number(&mut self, prompt: &str) -> AppResult<Option<i64>> {
        loop {
            let Some(line) = self.read_line(prompt).await? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(n) => return Ok(Some(n)),
                Err(_) => self.say("Please enter a valid number.").await?,
            }
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` in local time
fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, repository::Repository};

    async fn run_script(services: Services, script: &str) -> String {
        let mut console = LibraryConsole::new(services, script.as_bytes(), Vec::new());
        console.run().await.unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    async fn services() -> Services {
        Services::new(Repository::new(db::memory_pool().await.unwrap()))
    }

    #[tokio::test]
    async fn test_exit_immediately() {
        let out = run_script(services().await, "0\n").await;
        assert!(out.contains("=== Library Management System ==="));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_end_of_input_leaves_submenu() {
        let out = run_script(services().await, "1\n").await;
        assert!(out.contains("=== Book Management ==="));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_invalid_input_reprompts() {
        let out = run_script(services().await, "abc\n9\n0\n").await;
        assert!(out.contains("Please enter a valid number."));
        assert!(out.contains(INVALID_CHOICE));
    }

    #[tokio::test]
    async fn test_add_and_search_books() {
        let services = services().await;
        let script = "1\n1\nClean Code\nRobert C. Martin\n978-0132350884\n3\nclean\n3\nnothing\n0\n0\n";

        let out = run_script(services.clone(), script).await;

        assert!(out.contains("Book added successfully! (ID: 1)"));
        assert!(out.contains(
            "ID: 1 | ISBN: 978-0132350884 | Title: Clean Code | Author: Robert C. Martin | Status: Available"
        ));
        assert!(out.contains("No books found."));
    }

    #[tokio::test]
    async fn test_borrow_and_return_flow() {
        let services = services().await;
        let book = services
            .books
            .add_book("Clean Code", "Robert C. Martin", "978-0132350884")
            .await
            .unwrap();
        let john = services
            .members
            .register("John Doe", "john.doe@example.com", "555-0101")
            .await
            .unwrap();
        let jane = services
            .members
            .register("Jane Smith", "jane.smith@example.com", "555-0102")
            .await
            .unwrap();

        let script = format!(
            "3\n1\n{john}\n{book}\n1\n{jane}\n{book}\n2\n{john}\n{book}\n2\n{jane}\n{book}\n3\n0\n0\n",
            john = john.id,
            jane = jane.id,
            book = book.id
        );
        let out = run_script(services.clone(), &script).await;

        assert!(out.contains("Book borrowed successfully!"));
        assert!(out.contains("Error borrowing book: Book is not available"));
        assert!(out.contains("Book returned successfully!"));
        assert!(out.contains("Error returning book: No active borrow record found"));
        assert!(out.contains(&format!("Member ID: {} | Book ISBN: 978-0132350884", john.id)));
        assert!(!out.contains("Not returned"));
        assert!(services.books.get(book.id).await.unwrap().available);
    }

    #[tokio::test]
    async fn test_register_member_validation_error() {
        let out = run_script(
            services().await,
            "2\n1\nJohn Doe\nnot-an-email\n555\n2\n0\n0\n",
        )
        .await;
        assert!(out.contains("Error registering member: Validation error: Invalid email format"));
        assert!(!out.contains("ID: 1 | Name: John Doe"));
    }
}
