//! Category operations

use std::sync::Arc;

use crate::db::{Category, LibraryStore};

use super::error::{LibraryError, LibraryResult};

pub struct CategoryService {
    store: Arc<dyn LibraryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> LibraryResult<Vec<Category>> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn get(&self, id: i64) -> LibraryResult<Category> {
        self.store
            .find_category(id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Categoria no encontrada"))
    }

    /// Names are upper-cased before the uniqueness check, so "fiction" and
    /// "Fiction" collide.
    pub async fn create(&self, name: Option<&str>) -> LibraryResult<Category> {
        let name = match name {
            Some(n) if !n.is_empty() => n.to_uppercase(),
            _ => return Err(LibraryError::invalid("Falta enviar el nombre")),
        };

        if self.store.find_category_by_name(&name).await?.is_some() {
            return Err(LibraryError::conflict("Ese nombre de categoria ya existe"));
        }

        let id = self.store.insert_category(&name).await?;
        tracing::info!(category_id = id, %name, "Category created");

        Ok(Category { id, name })
    }

    pub async fn delete(&self, id: i64) -> LibraryResult<()> {
        if self.store.find_category(id).await?.is_none() {
            return Err(LibraryError::not_found("No existe la categoria indicada"));
        }

        if self.store.count_books_in_category(id).await? > 0 {
            return Err(LibraryError::conflict(
                "Categoria con libros asociados; no se puede eliminar",
            ));
        }

        if self.store.delete_category(id).await? == 0 {
            return Err(LibraryError::not_found("No existe la categoria indicada"));
        }
        tracing::info!(category_id = id, "Category deleted");

        Ok(())
    }
}
