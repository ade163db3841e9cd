//! Services Module
//!
//! Domain operations over categories, people and books. Each service holds
//! the injected store and runs its checks as sequential store calls.
//!
//! # Services
//! - `CategoryService`: create/list/get/delete categories
//! - `PersonService`: register and maintain borrowers
//! - `BookService`: book CRUD and the lend/return state machine

mod book;
mod category;
mod email;
mod error;
mod person;

pub use book::{BookDraft, BookService};
pub use category::CategoryService;
pub use email::is_email_valid;
pub use error::{LibraryError, LibraryResult};
pub use person::{PersonDraft, PersonService};
