//! Repository Pattern Implementation
//!
//! # Q&A
//!
//! Q: Why a trait instead of calling the pool directly from handlers?
//! A: The services only need a handful of keyed lookups and writes.
//!
//!    - Services receive an `Arc<dyn LibraryStore>`, never a global handle
//!    - PostgreSQL (`Database`) and in-memory (`MemoryStore`) share one contract
//!    - Service and route tests run without a database
//!
//! Q: Why are lend/return conditional updates?
//! A: The services check the book state first and then write. Two lend
//!    requests for the same book can both pass the check, so the write itself
//!    only succeeds while the holder is still in the expected state and
//!    reports the affected row count.

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Book, Category, NewBook, NewPerson, Person};

/// Store failure
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(db_err.message().to_string());
            }
        }
        StoreError::Unavailable(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract consumed by the services
///
/// Every write returns either the generated id or the affected row count;
/// deciding what a zero count means is left to the caller.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn health_check(&self) -> StoreResult<()>;

    // ============ Categories ============

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>>;
    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>>;
    async fn insert_category(&self, name: &str) -> StoreResult<i64>;
    async fn delete_category(&self, id: i64) -> StoreResult<u64>;

    // ============ People ============

    async fn list_people(&self) -> StoreResult<Vec<Person>>;
    async fn find_person(&self, id: i64) -> StoreResult<Option<Person>>;
    async fn find_person_by_email(&self, email: &str) -> StoreResult<Option<Person>>;
    async fn insert_person(&self, person: &NewPerson) -> StoreResult<i64>;
    async fn update_person(&self, id: i64, person: &NewPerson) -> StoreResult<u64>;
    async fn delete_person(&self, id: i64) -> StoreResult<u64>;

    // ============ Books ============

    async fn list_books(&self) -> StoreResult<Vec<Book>>;
    async fn find_book(&self, id: i64) -> StoreResult<Option<Book>>;
    async fn find_book_by_name(&self, name: &str) -> StoreResult<Option<Book>>;
    async fn insert_book(&self, book: &NewBook) -> StoreResult<i64>;
    async fn update_book_description(&self, id: i64, description: Option<&str>) -> StoreResult<u64>;

    /// Deletes only while the book has no holder
    async fn delete_book(&self, id: i64) -> StoreResult<u64>;

    async fn count_books_in_category(&self, category_id: i64) -> StoreResult<i64>;
    async fn count_books_held_by(&self, person_id: i64) -> StoreResult<i64>;

    /// Sets the holder only while the book has none
    async fn lend_book(&self, book_id: i64, person_id: i64) -> StoreResult<u64>;

    /// Clears the holder only while the book has one
    async fn return_book(&self, book_id: i64) -> StoreResult<u64>;
}
