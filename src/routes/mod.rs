//! API Routes Module
//!
//! Every HTTP endpoint and the router that ties them together.
//!
//! # Routes
//! - `/health` - health check
//! - `/categoria` - categories
//! - `/persona` - people
//! - `/libro` - books, plus `/libro/prestar/:id` and `/libro/devolver/:id`

pub mod book;
pub mod category;
pub mod health;
pub mod person;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, HeaderMap, HeaderValue, Method},
    routing::{get, put},
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    config::ErrorStyle,
    error::{normalize_error_response, ApiError},
    AppState,
};

/// JSON body extractor whose rejection goes through [`ApiError`]
///
/// A request without a JSON content type, or with an empty body, yields
/// `T::default()`; missing fields are then reported by the service checks
/// with their own messages.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !has_json_content_type(req.headers()) {
            return Ok(AppJson(T::default()));
        }

        let bytes = Bytes::from_request(req, state).await?;
        if bytes.is_empty() {
            return Ok(AppJson(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(AppJson(value))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|essence| essence.trim().to_ascii_lowercase())
        .is_some_and(|essence| {
            essence == "application/json"
                || (essence.starts_with("application/") && essence.ends_with("+json"))
        })
}

/// Path extractor whose rejection goes through [`ApiError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct IdPath<T>(pub T);

/// Build the application router
///
/// # Route Structure
///
/// ```text
/// GET    /health               - server and store status
///
/// GET    /categoria            - list categories
/// POST   /categoria            - create a category
/// GET    /categoria/:id        - one category
/// DELETE /categoria/:id        - delete an unused category
///
/// GET    /persona              - list people
/// POST   /persona              - register a person
/// GET    /persona/:id          - one person
/// PUT    /persona/:id          - overwrite a person
/// DELETE /persona/:id          - delete a person holding no books
///
/// GET    /libro                - list books
/// POST   /libro                - create a book
/// GET    /libro/:id            - one book
/// PUT    /libro/:id            - change the description
/// DELETE /libro/:id            - delete a book that is not on loan
/// PUT    /libro/prestar/:id    - lend a book
/// PUT    /libro/devolver/:id   - return a book
/// ```
pub fn create_router(state: AppState) -> Router {
    let cors = if state.config.is_production() {
        let origins: Vec<HeaderValue> = state
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        CorsLayer::new()
            .allow_origin([
                HeaderValue::from_static("http://localhost:5173"),
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://127.0.0.1:5173"),
            ])
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let error_style = state.config.error_style;

    let router = Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // Categories
        .route(
            "/categoria",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/categoria/:id",
            get(category::get_category).delete(category::delete_category),
        )

        // People
        .route("/persona", get(person::list_people).post(person::create_person))
        .route(
            "/persona/:id",
            get(person::get_person)
                .put(person::update_person)
                .delete(person::delete_person),
        )

        // Books
        .route("/libro", get(book::list_books).post(book::create_book))
        .route(
            "/libro/:id",
            get(book::get_book)
                .put(book::update_book)
                .delete(book::delete_book),
        )
        .route("/libro/prestar/:id", put(book::lend_book))
        .route("/libro/devolver/:id", put(book::return_book));

    let router = match error_style {
        ErrorStyle::Legacy => router,
        ErrorStyle::Strict => router.layer(axum::middleware::map_response(normalize_error_response)),
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
