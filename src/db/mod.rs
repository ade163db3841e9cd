//! Database Module
//!
//! # Q&A
//!
//! Q: Why PostgreSQL and SQLx?
//! A: The data is three small relational tables with UNIQUE and FOREIGN KEY
//!    constraints. SQLx gives an async pool and embedded migrations without
//!    an ORM layer in between.
//!
//! Q: How is the connection pool managed?
//! A: `PgPool` from SQLx
//!    - min/max connection bounds
//!    - connection reuse
//!    - acquire timeout, so no store call waits forever

mod memory;
mod models;
mod repository;
#[cfg(test)]
mod unavailable;

pub use memory::MemoryStore;
#[cfg(test)]
pub(crate) use unavailable::UnavailableStore;
pub use models::*;
pub use repository::{LibraryStore, StoreError, StoreResult};

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// PostgreSQL-backed store
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to the database
    ///
    /// # Connection Pool Settings
    ///
    /// - max_connections: 10
    /// - min_connections: 1
    /// - acquire_timeout: 3 seconds
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run embedded migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LibraryStore for Database {
    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ============ Categories ============

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, nombre FROM categoria ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, nombre FROM categoria WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, nombre FROM categoria WHERE nombre = $1"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn insert_category(&self, name: &str) -> StoreResult<i64> {
        let id: (i64,) = sqlx::query_as(
            "INSERT INTO categoria (nombre) VALUES ($1) RETURNING id"
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(id.0)
    }

    async fn delete_category(&self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM categoria WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ============ People ============

    async fn list_people(&self) -> StoreResult<Vec<Person>> {
        let people = sqlx::query_as::<_, Person>(
            "SELECT id, nombre, apellido, mail, alias FROM persona ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(people)
    }

    async fn find_person(&self, id: i64) -> StoreResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, nombre, apellido, mail, alias FROM persona WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    async fn find_person_by_email(&self, email: &str) -> StoreResult<Option<Person>> {
        let person = sqlx::query_as::<_, Person>(
            "SELECT id, nombre, apellido, mail, alias FROM persona WHERE mail = $1"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(person)
    }

    async fn insert_person(&self, person: &NewPerson) -> StoreResult<i64> {
        let id: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO persona (nombre, apellido, mail, alias)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#
        )
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(&person.alias)
        .fetch_one(&self.pool)
        .await?;

        Ok(id.0)
    }

    async fn update_person(&self, id: i64, person: &NewPerson) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE persona
            SET nombre = $1, apellido = $2, mail = $3, alias = $4
            WHERE id = $5
            "#
        )
        .bind(&person.first_name)
        .bind(&person.last_name)
        .bind(&person.email)
        .bind(&person.alias)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_person(&self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM persona WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // ============ Books ============

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, nombre, descripcion, id_categoria, id_persona FROM libro ORDER BY id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn find_book(&self, id: i64) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, nombre, descripcion, id_categoria, id_persona FROM libro WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn find_book_by_name(&self, name: &str) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, nombre, descripcion, id_categoria, id_persona FROM libro WHERE nombre = $1"
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn insert_book(&self, book: &NewBook) -> StoreResult<i64> {
        let id: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO libro (nombre, descripcion, id_categoria, id_persona)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#
        )
        .bind(&book.name)
        .bind(&book.description)
        .bind(book.category_id)
        .bind(book.holder_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(id.0)
    }

    async fn update_book_description(&self, id: i64, description: Option<&str>) -> StoreResult<u64> {
        let result = sqlx::query("UPDATE libro SET descripcion = $1 WHERE id = $2")
            .bind(description)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_book(&self, id: i64) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM libro WHERE id = $1 AND id_persona IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn count_books_in_category(&self, category_id: i64) -> StoreResult<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM libro WHERE id_categoria = $1"
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn count_books_held_by(&self, person_id: i64) -> StoreResult<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM libro WHERE id_persona = $1"
        )
        .bind(person_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn lend_book(&self, book_id: i64, person_id: i64) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE libro SET id_persona = $1 WHERE id = $2 AND id_persona IS NULL"
        )
        .bind(person_id)
        .bind(book_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn return_book(&self, book_id: i64) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE libro SET id_persona = NULL WHERE id = $1 AND id_persona IS NOT NULL"
        )
        .bind(book_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
