//! WhereIsMyBook API Library
//!
//! # Overview
//!
//! Backend for a small lending library: categories group books, people
//! register to borrow them, and each book is either on the shelf or held by
//! exactly one person.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                         API                              │
//! │                                                          │
//! │  ┌─────────┐      ┌──────────┐      ┌──────────────┐    │
//! │  │ Routes  │ ───▶ │ Services │ ───▶ │ LibraryStore │    │
//! │  └─────────┘      └──────────┘      └──────┬───────┘    │
//! │                                            │            │
//! └────────────────────────────────────────────┼────────────┘
//!                                              │
//!                              ┌───────────────┴──────────┐
//!                              ▼                          ▼
//!                      ┌──────────────┐          ┌──────────────┐
//!                      │  PostgreSQL  │          │  In-memory   │
//!                      └──────────────┘          └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: environment configuration
//! - `error`: HTTP error rendering (legacy and strict styles)
//! - `routes`: HTTP endpoint handlers
//! - `services`: domain rules (categories, people, lending)
//! - `db`: store trait, PostgreSQL and in-memory implementations
//! - `types`: response envelopes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use whereismybook_api::{config::Config, db::MemoryStore, routes, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let state = AppState::new(Arc::new(MemoryStore::new()), config);
//!     let app = routes::create_router(state);
//!
//!     // ... serve `app`
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use db::{Database, LibraryStore, MemoryStore};
pub use error::ApiError;
pub use services::{BookService, CategoryService, PersonService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LibraryStore>,
    pub categories: Arc<CategoryService>,
    pub people: Arc<PersonService>,
    pub books: Arc<BookService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire every service to the same store instance
    pub fn new(store: Arc<dyn LibraryStore>, config: Config) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(store.clone())),
            people: Arc::new(PersonService::new(store.clone())),
            books: Arc::new(BookService::new(store.clone())),
            store,
            config: Arc::new(config),
        }
    }
}
