//! Book Endpoints
//!
//! CRUD over books plus the two lending transitions. The handlers only
//! translate between JSON and [`BookDraft`]; every rule lives in
//! `BookService`.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    db::Book,
    error::ApiError,
    services::BookDraft,
    types::Mensaje,
    AppState,
};

use super::{AppJson, IdPath};

// ============ Request/Response Types ============

/// Body of `POST /libro` and `PUT /libro/:id`
#[derive(Debug, Default, Deserialize)]
pub struct BookRequest {
    #[serde(rename = "nombre", alias = "name")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", alias = "description")]
    pub description: Option<String>,
    #[serde(rename = "id_categoria", alias = "categoryId")]
    pub category_id: Option<i64>,
    #[serde(rename = "id_persona", alias = "personId")]
    pub person_id: Option<i64>,
}

impl From<BookRequest> for BookDraft {
    fn from(req: BookRequest) -> Self {
        BookDraft {
            name: req.name,
            description: req.description,
            category_id: req.category_id,
            person_id: req.person_id,
        }
    }
}

/// Body of `PUT /libro/prestar/:id`
#[derive(Debug, Default, Deserialize)]
pub struct LendRequest {
    #[serde(rename = "id_persona", alias = "personId")]
    pub person_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedBookResponse {
    pub id: i64,
    pub respuesta: String,
}

// ============ Handlers ============

/// GET /libro
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(state.books.list().await?))
}

/// GET /libro/:id
pub async fn get_book(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.books.get(id).await?))
}

/// POST /libro
///
/// # Request
///
/// ```json
/// { "nombre": "Dune", "descripcion": "desert planet", "id_categoria": 1, "id_persona": null }
/// ```
///
/// # Response
///
/// ```json
/// { "id": 1, "respuesta": "su libro DUNE se guardado correctamente" }
/// ```
pub async fn create_book(
    State(state): State<AppState>,
    AppJson(req): AppJson<BookRequest>,
) -> Result<Json<CreatedBookResponse>, ApiError> {
    let book = state.books.create(req.into()).await?;

    Ok(Json(CreatedBookResponse {
        id: book.id,
        respuesta: format!("su libro {} se guardado correctamente", book.name),
    }))
}

/// PUT /libro/:id
///
/// Only `descripcion` may differ from the stored book.
pub async fn update_book(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
    AppJson(req): AppJson<BookRequest>,
) -> Result<Json<Book>, ApiError> {
    let book = state.books.update_description(id, req.into()).await?;
    Ok(Json(book))
}

/// DELETE /libro/:id
pub async fn delete_book(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Mensaje>, ApiError> {
    state.books.delete(id).await?;
    Ok(Json(Mensaje::new("Se borró correctamente")))
}

/// PUT /libro/prestar/:id
pub async fn lend_book(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
    AppJson(req): AppJson<LendRequest>,
) -> Result<Json<Mensaje>, ApiError> {
    state.books.lend(id, req.person_id).await?;
    Ok(Json(Mensaje::new("Se prestó correctamente")))
}

/// PUT /libro/devolver/:id
pub async fn return_book(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Mensaje>, ApiError> {
    state.books.return_book(id).await?;
    Ok(Json(Mensaje::new("Se realizó la devolución correctamente")))
}
