//! Store double whose every call fails with `StoreError::Unavailable`

use async_trait::async_trait;

use super::models::{Book, Category, NewBook, NewPerson, Person};
use super::repository::{LibraryStore, StoreError, StoreResult};

/// Behaves like a database that dropped every connection
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }

    fn fail<T>(&self) -> StoreResult<T> {
        Err(StoreError::Unavailable(self.reason.clone()))
    }
}

#[async_trait]
impl LibraryStore for UnavailableStore {
    async fn health_check(&self) -> StoreResult<()> {
        self.fail()
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.fail()
    }

    async fn find_category(&self, _id: i64) -> StoreResult<Option<Category>> {
        self.fail()
    }

    async fn find_category_by_name(&self, _name: &str) -> StoreResult<Option<Category>> {
        self.fail()
    }

    async fn insert_category(&self, _name: &str) -> StoreResult<i64> {
        self.fail()
    }

    async fn delete_category(&self, _id: i64) -> StoreResult<u64> {
        self.fail()
    }

    async fn list_people(&self) -> StoreResult<Vec<Person>> {
        self.fail()
    }

    async fn find_person(&self, _id: i64) -> StoreResult<Option<Person>> {
        self.fail()
    }

    async fn find_person_by_email(&self, _email: &str) -> StoreResult<Option<Person>> {
        self.fail()
    }

    async fn insert_person(&self, _person: &NewPerson) -> StoreResult<i64> {
        self.fail()
    }

    async fn update_person(&self, _id: i64, _person: &NewPerson) -> StoreResult<u64> {
        self.fail()
    }

    async fn delete_person(&self, _id: i64) -> StoreResult<u64> {
        self.fail()
    }

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        self.fail()
    }

    async fn find_book(&self, _id: i64) -> StoreResult<Option<Book>> {
        self.fail()
    }

    async fn find_book_by_name(&self, _name: &str) -> StoreResult<Option<Book>> {
        self.fail()
    }

    async fn insert_book(&self, _book: &NewBook) -> StoreResult<i64> {
        self.fail()
    }

    async fn update_book_description(&self, _id: i64, _description: Option<&str>) -> StoreResult<u64> {
        self.fail()
    }

    async fn delete_book(&self, _id: i64) -> StoreResult<u64> {
        self.fail()
    }

    async fn count_books_in_category(&self, _category_id: i64) -> StoreResult<i64> {
        self.fail()
    }

    async fn count_books_held_by(&self, _person_id: i64) -> StoreResult<i64> {
        self.fail()
    }

    async fn lend_book(&self, _book_id: i64, _person_id: i64) -> StoreResult<u64> {
        self.fail()
    }

    async fn return_book(&self, _book_id: i64) -> StoreResult<u64> {
        self.fail()
    }
}
