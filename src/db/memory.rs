//! In-memory store
//!
//! Mirrors the PostgreSQL schema closely enough for the services to behave
//! identically: generated ids, UNIQUE columns and foreign keys are enforced
//! here too. Used by the test suites and by `STORE_BACKEND=memory`.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::models::{Book, Category, NewBook, NewPerson, Person};
use super::repository::{LibraryStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    people: BTreeMap<i64, Person>,
    books: BTreeMap<i64, Book>,
    next_category_id: i64,
    next_person_id: i64,
    next_book_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.people
            .values()
            .any(|p| p.email == email && Some(p.id) != except)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }

    // ============ Categories ============

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        Ok(self
            .read()?
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn insert_category(&self, name: &str) -> StoreResult<i64> {
        let mut tables = self.write()?;
        if tables.categories.values().any(|c| c.name == name) {
            return Err(StoreError::UniqueViolation(format!("categoria.nombre = {name}")));
        }
        let id = next_id(&mut tables.next_category_id);
        tables.categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
            },
        );
        Ok(id)
    }

    async fn delete_category(&self, id: i64) -> StoreResult<u64> {
        let mut tables = self.write()?;
        if tables.books.values().any(|b| b.category_id == id) {
            return Err(StoreError::ForeignKeyViolation(format!("libro.id_categoria = {id}")));
        }
        Ok(tables.categories.remove(&id).map_or(0, |_| 1))
    }

    // ============ People ============

    async fn list_people(&self) -> StoreResult<Vec<Person>> {
        Ok(self.read()?.people.values().cloned().collect())
    }

    async fn find_person(&self, id: i64) -> StoreResult<Option<Person>> {
        Ok(self.read()?.people.get(&id).cloned())
    }

    async fn find_person_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        Ok(self
            .read()?
            .people
            .values()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn insert_person(&self, person: &NewPerson) -> StoreResult<i64> {
        let mut tables = self.write()?;
        if tables.email_taken(&person.email, None) {
            return Err(StoreError::UniqueViolation(format!("persona.mail = {}", person.email)));
        }
        let id = next_id(&mut tables.next_person_id);
        tables.people.insert(
            id,
            Person {
                id,
                first_name: person.first_name.clone(),
                last_name: person.last_name.clone(),
                email: person.email.clone(),
                alias: person.alias.clone(),
            },
        );
        Ok(id)
    }

    async fn update_person(&self, id: i64, person: &NewPerson) -> StoreResult<u64> {
        let mut tables = self.write()?;
        if !tables.people.contains_key(&id) {
            return Ok(0);
        }
        if tables.email_taken(&person.email, Some(id)) {
            return Err(StoreError::UniqueViolation(format!("persona.mail = {}", person.email)));
        }
        tables.people.insert(
            id,
            Person {
                id,
                first_name: person.first_name.clone(),
                last_name: person.last_name.clone(),
                email: person.email.clone(),
                alias: person.alias.clone(),
            },
        );
        Ok(1)
    }

    async fn delete_person(&self, id: i64) -> StoreResult<u64> {
        let mut tables = self.write()?;
        if tables.books.values().any(|b| b.holder_id == Some(id)) {
            return Err(StoreError::ForeignKeyViolation(format!("libro.id_persona = {id}")));
        }
        Ok(tables.people.remove(&id).map_or(0, |_| 1))
    }

    // ============ Books ============

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        Ok(self.read()?.books.values().cloned().collect())
    }

    async fn find_book(&self, id: i64) -> StoreResult<Option<Book>> {
        Ok(self.read()?.books.get(&id).cloned())
    }

    async fn find_book_by_name(&self, name: &str) -> StoreResult<Option<Book>> {
        Ok(self
            .read()?
            .books
            .values()
            .find(|b| b.name == name)
            .cloned())
    }

    async fn insert_book(&self, book: &NewBook) -> StoreResult<i64> {
        let mut tables = self.write()?;
        if tables.books.values().any(|b| b.name == book.name) {
            return Err(StoreError::UniqueViolation(format!("libro.nombre = {}", book.name)));
        }
        if !tables.categories.contains_key(&book.category_id) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "categoria.id = {}",
                book.category_id
            )));
        }
        if let Some(holder_id) = book.holder_id {
            if !tables.people.contains_key(&holder_id) {
                return Err(StoreError::ForeignKeyViolation(format!("persona.id = {holder_id}")));
            }
        }
        let id = next_id(&mut tables.next_book_id);
        tables.books.insert(
            id,
            Book {
                id,
                name: book.name.clone(),
                description: book.description.clone(),
                category_id: book.category_id,
                holder_id: book.holder_id,
            },
        );
        Ok(id)
    }

    async fn update_book_description(&self, id: i64, description: Option<&str>) -> StoreResult<u64> {
        let mut tables = self.write()?;
        match tables.books.get_mut(&id) {
            Some(book) => {
                book.description = description.map(str::to_string);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_book(&self, id: i64) -> StoreResult<u64> {
        let mut tables = self.write()?;
        let available = tables
            .books
            .get(&id)
            .is_some_and(|b| b.holder_id.is_none());
        if !available {
            return Ok(0);
        }
        tables.books.remove(&id);
        Ok(1)
    }

    async fn count_books_in_category(&self, category_id: i64) -> StoreResult<i64> {
        let count = self
            .read()?
            .books
            .values()
            .filter(|b| b.category_id == category_id)
            .count();
        Ok(count as i64)
    }

    async fn count_books_held_by(&self, person_id: i64) -> StoreResult<i64> {
        let count = self
            .read()?
            .books
            .values()
            .filter(|b| b.holder_id == Some(person_id))
            .count();
        Ok(count as i64)
    }

    async fn lend_book(&self, book_id: i64, person_id: i64) -> StoreResult<u64> {
        let mut tables = self.write()?;
        if !tables.people.contains_key(&person_id) {
            return Err(StoreError::ForeignKeyViolation(format!("persona.id = {person_id}")));
        }
        match tables.books.get_mut(&book_id) {
            Some(book) if book.holder_id.is_none() => {
                book.holder_id = Some(person_id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn return_book(&self, book_id: i64) -> StoreResult<u64> {
        let mut tables = self.write()?;
        match tables.books.get_mut(&book_id) {
            Some(book) if book.holder_id.is_some() => {
                book.holder_id = None;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> NewPerson {
        NewPerson {
            first_name: "JANE".to_string(),
            last_name: "DOE".to_string(),
            email: "jane@example.com".to_string(),
            alias: None,
        }
    }

    #[tokio::test]
    async fn test_generated_ids_are_sequential() {
        let store = MemoryStore::new();
        assert_eq!(store.insert_category("FICTION").await.unwrap(), 1);
        assert_eq!(store.insert_category("POETRY").await.unwrap(), 2);
        assert_eq!(store.list_categories().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unique_columns_are_enforced() {
        let store = MemoryStore::new();
        store.insert_category("FICTION").await.unwrap();
        assert!(matches!(
            store.insert_category("FICTION").await,
            Err(StoreError::UniqueViolation(_))
        ));

        store.insert_person(&jane()).await.unwrap();
        assert!(matches!(
            store.insert_person(&jane()).await,
            Err(StoreError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_person_rejects_email_of_someone_else() {
        let store = MemoryStore::new();
        store.insert_person(&jane()).await.unwrap();
        let mut john = jane();
        john.email = "john@example.com".to_string();
        let john_id = store.insert_person(&john).await.unwrap();

        john.email = "jane@example.com".to_string();
        assert!(matches!(
            store.update_person(john_id, &john).await,
            Err(StoreError::UniqueViolation(_))
        ));
        assert_eq!(store.update_person(99, &john).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_conditional_lend_and_return() {
        let store = MemoryStore::new();
        let category_id = store.insert_category("FICTION").await.unwrap();
        let person_id = store.insert_person(&jane()).await.unwrap();
        let book_id = store
            .insert_book(&NewBook {
                name: "DUNE".to_string(),
                description: None,
                category_id,
                holder_id: None,
            })
            .await
            .unwrap();

        assert_eq!(store.lend_book(book_id, person_id).await.unwrap(), 1);
        assert_eq!(store.lend_book(book_id, person_id).await.unwrap(), 0);
        assert_eq!(store.count_books_held_by(person_id).await.unwrap(), 1);

        assert_eq!(store.return_book(book_id).await.unwrap(), 1);
        assert_eq!(store.return_book(book_id).await.unwrap(), 0);
        assert_eq!(store.count_books_held_by(person_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_foreign_keys_block_deletes() {
        let store = MemoryStore::new();
        let category_id = store.insert_category("FICTION").await.unwrap();
        store
            .insert_book(&NewBook {
                name: "DUNE".to_string(),
                description: Some("desert planet".to_string()),
                category_id,
                holder_id: None,
            })
            .await
            .unwrap();

        assert!(matches!(
            store.delete_category(category_id).await,
            Err(StoreError::ForeignKeyViolation(_))
        ));
        assert_eq!(store.count_books_in_category(category_id).await.unwrap(), 1);
    }
}
