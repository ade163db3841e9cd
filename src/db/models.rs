//! Database Models
//!
//! Row types for the three library tables. Rust field names are English;
//! the column and JSON names stay on the legacy Spanish schema that existing
//! clients already speak.

use serde::Serialize;
use sqlx::FromRow;

/// Book category (`categoria` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub id: i64,

    /// Always stored upper-cased
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub name: String,
}

/// Registered borrower (`persona` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Person {
    pub id: i64,

    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub first_name: String,

    #[serde(rename = "apellido")]
    #[sqlx(rename = "apellido")]
    pub last_name: String,

    /// Compared verbatim, case-sensitive
    #[serde(rename = "mail")]
    #[sqlx(rename = "mail")]
    pub email: String,

    pub alias: Option<String>,
}

/// Lendable book (`libro` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Book {
    pub id: i64,

    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub name: String,

    #[serde(rename = "descripcion")]
    #[sqlx(rename = "descripcion")]
    pub description: Option<String>,

    #[serde(rename = "id_categoria")]
    #[sqlx(rename = "id_categoria")]
    pub category_id: i64,

    /// `None` while the book sits on the shelf
    #[serde(rename = "id_persona")]
    #[sqlx(rename = "id_persona")]
    pub holder_id: Option<i64>,
}

/// Where a book currently is in the lending cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanState {
    Available,
    OnLoan(i64),
}

impl Book {
    pub fn loan_state(&self) -> LoanState {
        match self.holder_id {
            Some(person_id) => LoanState::OnLoan(person_id),
            None => LoanState::Available,
        }
    }
}

/// Fields for inserting or overwriting a person
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub alias: Option<String>,
}

/// Fields for inserting a book
#[derive(Debug, Clone)]
pub struct NewBook {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub holder_id: Option<i64>,
}
