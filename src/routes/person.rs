//! Person Endpoints

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::{
    db::Person,
    error::{ApiError, ErrorBody},
    services::PersonDraft,
    types::{Mensaje, Respuesta},
    AppState,
};

use super::{AppJson, IdPath};

// ============ Request Types ============

/// Body of `POST /persona` and `PUT /persona/:id`
#[derive(Debug, Default, Deserialize)]
pub struct PersonRequest {
    #[serde(rename = "nombre", alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido", alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "mail", alias = "email")]
    pub email: Option<String>,
    pub alias: Option<String>,
}

impl From<PersonRequest> for PersonDraft {
    fn from(req: PersonRequest) -> Self {
        PersonDraft {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            alias: req.alias,
        }
    }
}

// ============ Handlers ============

/// GET /persona
///
/// A failure answers an empty list.
pub async fn list_people(State(state): State<AppState>) -> Result<Json<Vec<Person>>, ApiError> {
    let people = state
        .people
        .list()
        .await
        .map_err(|e| ApiError::from(e).with_body(ErrorBody::EmptyList))?;

    Ok(Json(people))
}

/// GET /persona/:id
pub async fn get_person(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Respuesta<Person>>, ApiError> {
    let person = state.people.get(id).await?;
    Ok(Json(Respuesta::single(person)))
}

/// POST /persona
///
/// # Request
///
/// ```json
/// { "nombre": "Jane", "apellido": "Doe", "mail": "jane@example.com", "alias": "jd" }
/// ```
pub async fn create_person(
    State(state): State<AppState>,
    AppJson(req): AppJson<PersonRequest>,
) -> Result<Json<Person>, ApiError> {
    let person = state.people.create(req.into()).await?;
    Ok(Json(person))
}

/// PUT /persona/:id
pub async fn update_person(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
    AppJson(req): AppJson<PersonRequest>,
) -> Result<Json<Person>, ApiError> {
    let person = state.people.update(id, req.into()).await?;
    Ok(Json(person))
}

/// DELETE /persona/:id
pub async fn delete_person(
    State(state): State<AppState>,
    IdPath(id): IdPath<i64>,
) -> Result<Json<Mensaje>, ApiError> {
    state.people.delete(id).await?;
    Ok(Json(Mensaje::new("Se borró correctamente")))
}
