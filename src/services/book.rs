//! Book operations and the lending state machine
//!
//! # States
//!
//! ```text
//!              lend(person)
//!   Available ──────────────▶ OnLoan(person)
//!       ▲                          │
//!       └──────── return ──────────┘
//! ```
//!
//! There is no OnLoan → OnLoan edge: handing a book to someone else means
//! returning it first. Deleting is only allowed from `Available`.
//!
//! Every transition first reads the book to pick the right error message,
//! then issues a conditional write. A zero affected-row count means another
//! request changed the state in between, and is reported as the same
//! conflict the read would have produced.

use std::sync::Arc;

use crate::db::{Book, LibraryStore, LoanState, NewBook};

use super::error::{LibraryError, LibraryResult};

const ALREADY_ON_LOAN: &str =
    "El libro ya se encuentra prestado; no se puede prestar hasta que no se devuelva";
const NOT_ON_LOAN: &str = "Ese libro no estaba prestado!";
const ON_LOAN_NOT_DELETABLE: &str = "Ese libro prestado no se puede borrar";

/// Book fields as submitted by a client
///
/// The same shape is used for creation and for the description-only update,
/// where every field but `description` must repeat the stored value.
#[derive(Debug, Clone, Default)]
pub struct BookDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub person_id: Option<i64>,
}

impl BookDraft {
    /// Clients send `0` (or nothing) for "no holder"
    fn holder_id(&self) -> Option<i64> {
        self.person_id.filter(|id| *id != 0)
    }
}

pub struct BookService {
    store: Arc<dyn LibraryStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> LibraryResult<Vec<Book>> {
        Ok(self.store.list_books().await?)
    }

    pub async fn get(&self, id: i64) -> LibraryResult<Book> {
        self.store
            .find_book(id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Libro no encontrado"))
    }

    /// Create a book, `Available` unless a holder is given
    pub async fn create(&self, draft: BookDraft) -> LibraryResult<Book> {
        let holder_id = draft.holder_id();

        let (name, category_id) = match (draft.name, draft.category_id) {
            (Some(name), Some(category_id)) if !name.is_empty() && category_id != 0 => {
                (name.to_uppercase(), category_id)
            }
            _ => {
                return Err(LibraryError::invalid(
                    "Nombre y categoria son datos obligatorios",
                ))
            }
        };

        if let Some(person_id) = holder_id {
            if self.store.find_person(person_id).await?.is_none() {
                return Err(LibraryError::not_found("No existe la persona indicada"));
            }
        }

        if self.store.find_category(category_id).await?.is_none() {
            return Err(LibraryError::not_found("No existe la categoria indicada"));
        }

        if self.store.find_book_by_name(&name).await?.is_some() {
            return Err(LibraryError::conflict("Ese libro ya existe"));
        }

        let book = NewBook {
            name,
            description: draft.description,
            category_id,
            holder_id,
        };
        let id = self.store.insert_book(&book).await?;
        tracing::info!(book_id = id, name = %book.name, ?holder_id, "Book created");

        Ok(Book {
            id,
            name: book.name,
            description: book.description,
            category_id: book.category_id,
            holder_id: book.holder_id,
        })
    }

    /// Replace the description of a book
    ///
    /// The request must repeat the stored name, category and holder exactly;
    /// any difference is rejected without touching the row.
    pub async fn update_description(&self, id: i64, draft: BookDraft) -> LibraryResult<Book> {
        let book = self
            .store
            .find_book(id)
            .await?
            .ok_or_else(|| LibraryError::not_found("No se encuentra ese libro"))?;

        let same_name = draft
            .name
            .as_deref()
            .is_some_and(|name| name.to_uppercase() == book.name);
        let same_category = draft.category_id == Some(book.category_id);
        let same_holder = draft.holder_id() == book.holder_id;

        if !(same_name && same_category && same_holder) {
            return Err(LibraryError::conflict(
                "Sólo se puede modificar la descripción del libro",
            ));
        }

        if self
            .store
            .update_book_description(id, draft.description.as_deref())
            .await?
            == 0
        {
            return Err(LibraryError::not_found("No se encuentra ese libro"));
        }
        tracing::info!(book_id = id, "Book description updated");

        Ok(Book {
            description: draft.description,
            ..book
        })
    }

    pub async fn delete(&self, id: i64) -> LibraryResult<()> {
        let book = self
            .store
            .find_book(id)
            .await?
            .ok_or_else(|| LibraryError::not_found("No existe ese libro"))?;

        if let LoanState::OnLoan(_) = book.loan_state() {
            return Err(LibraryError::conflict(ON_LOAN_NOT_DELETABLE));
        }

        if self.store.delete_book(id).await? == 0 {
            return Err(LibraryError::conflict(ON_LOAN_NOT_DELETABLE));
        }
        tracing::info!(book_id = id, "Book deleted");

        Ok(())
    }

    /// `Available → OnLoan(person_id)`
    pub async fn lend(&self, book_id: i64, person_id: Option<i64>) -> LibraryResult<Book> {
        let book = self
            .store
            .find_book(book_id)
            .await?
            .ok_or_else(|| LibraryError::not_found("No se encontró el libro"))?;

        let person = match person_id {
            Some(id) => self.store.find_person(id).await?,
            None => None,
        };
        let Some(person) = person else {
            return Err(LibraryError::not_found(
                "No se encontro la persona a la que se quiere prestar el libro",
            ));
        };

        if let LoanState::OnLoan(holder_id) = book.loan_state() {
            tracing::debug!(book_id, holder_id, "Lend rejected, book already on loan");
            return Err(LibraryError::conflict(ALREADY_ON_LOAN));
        }

        if self.store.lend_book(book_id, person.id).await? == 0 {
            return Err(LibraryError::conflict(ALREADY_ON_LOAN));
        }
        tracing::info!(book_id, person_id = person.id, "Book lent");

        Ok(Book {
            holder_id: Some(person.id),
            ..book
        })
    }

    /// `OnLoan → Available`
    pub async fn return_book(&self, book_id: i64) -> LibraryResult<Book> {
        let book = self
            .store
            .find_book(book_id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Ese libro no existe"))?;

        let LoanState::OnLoan(holder_id) = book.loan_state() else {
            return Err(LibraryError::conflict(NOT_ON_LOAN));
        };

        if self.store.return_book(book_id).await? == 0 {
            return Err(LibraryError::conflict(NOT_ON_LOAN));
        }
        tracing::info!(book_id, holder_id, "Book returned");

        Ok(Book {
            holder_id: None,
            ..book
        })
    }
}
