//! Category Endpoints

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    db::Category,
    error::{ApiError, ErrorBody},
    types::{Mensaje, Respuesta},
    AppState,
};

use super::{AppJson, IdPath};

#[derive(Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(rename = "nombre", alias = "name")]
    pub name: Option<String>,
}

/// GET /categoria
///
/// Failures answer `{"error": ...}` instead of `{"mensaje": ...}`.
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state
        .categories
        .list()
        .await
        .map_err(|e| ApiError::from(e).with_body(ErrorBody::Error))?;

    Ok(Json(categories))
}

/// GET /categoria/:id
pub async fn get_category(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Respuesta<Category>>, ApiError> {
    let category = state.categories.get(id).await?;
    Ok(Json(Respuesta::single(category)))
}

/// POST /categoria
///
/// # Request
///
/// ```json
/// { "nombre": "fiction" }
/// ```
///
/// # Response
///
/// ```json
/// { "id": 1, "nombre": "FICTION" }
/// ```
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateCategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let category = state.categories.create(req.name.as_deref()).await?;
    Ok(Json(category))
}

/// DELETE /categoria/:id
pub async fn delete_category(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Mensaje>, ApiError> {
    state.categories.delete(id).await?;
    Ok(Json(Mensaje::new("Se borró correctamente")))
}
