//! Person operations

use std::sync::Arc;

use crate::db::{LibraryStore, NewPerson, Person};

use super::email::is_email_valid;
use super::error::{LibraryError, LibraryResult};

/// Person fields as submitted by a client, before any validation
#[derive(Debug, Clone, Default)]
pub struct PersonDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub alias: Option<String>,
}

pub struct PersonService {
    store: Arc<dyn LibraryStore>,
}

impl PersonService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> LibraryResult<Vec<Person>> {
        Ok(self.store.list_people().await?)
    }

    pub async fn get(&self, id: i64) -> LibraryResult<Person> {
        self.store
            .find_person(id)
            .await?
            .ok_or_else(|| LibraryError::not_found("Persona no encontrada"))
    }

    /// Register a new person
    ///
    /// # Check Order
    ///
    /// 1. email already registered → Conflict
    /// 2. email format → InvalidInput
    /// 3. required fields → InvalidInput
    ///
    /// The uniqueness lookup runs before the format check; clients see the
    /// "already registered" message even for malformed duplicates.
    pub async fn create(&self, draft: PersonDraft) -> LibraryResult<Person> {
        let email = draft.email.unwrap_or_default();

        if self.store.find_person_by_email(&email).await?.is_some() {
            return Err(LibraryError::conflict("El email ya se encuenta registrado"));
        }

        if !is_email_valid(&email) {
            return Err(LibraryError::invalid(
                "El formato del email ingresado es incorrecto",
            ));
        }

        let person = NewPerson {
            first_name: required_upper(draft.first_name)?,
            last_name: required_upper(draft.last_name)?,
            email,
            alias: draft.alias,
        };

        let id = self.store.insert_person(&person).await?;
        tracing::info!(person_id = id, "Person registered");

        Ok(into_person(id, person))
    }

    /// Overwrite every field of an existing person
    ///
    /// No uniqueness or format re-check happens here; the store's UNIQUE
    /// constraint on `mail` is the only guard left.
    pub async fn update(&self, id: i64, draft: PersonDraft) -> LibraryResult<Person> {
        let person = NewPerson {
            first_name: required_upper(draft.first_name)?,
            last_name: required_upper(draft.last_name)?,
            email: required(draft.email)?,
            alias: draft.alias,
        };

        if self.store.find_person(id).await?.is_none() {
            return Err(LibraryError::not_found("No se encuentra esa persona"));
        }

        if self.store.update_person(id, &person).await? == 0 {
            return Err(LibraryError::not_found("No se encuentra esa persona"));
        }
        tracing::info!(person_id = id, "Person updated");

        Ok(into_person(id, person))
    }

    pub async fn delete(&self, id: i64) -> LibraryResult<()> {
        if self.store.find_person(id).await?.is_none() {
            return Err(LibraryError::not_found("No existe esa persona"));
        }

        if self.store.count_books_held_by(id).await? > 0 {
            return Err(LibraryError::conflict(
                "Esa persona tiene libros asociados; no se puede eliminar",
            ));
        }

        if self.store.delete_person(id).await? == 0 {
            return Err(LibraryError::not_found("No existe esa persona"));
        }
        tracing::info!(person_id = id, "Person deleted");

        Ok(())
    }
}

fn required(value: Option<String>) -> LibraryResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LibraryError::invalid("Faltan datos")),
    }
}

fn required_upper(value: Option<String>) -> LibraryResult<String> {
    required(value).map(|v| v.to_uppercase())
}

fn into_person(id: i64, person: NewPerson) -> Person {
    Person {
        id,
        first_name: person.first_name,
        last_name: person.last_name,
        email: person.email,
        alias: person.alias,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, NewBook, UnavailableStore};
    use tokio_test::{assert_err, assert_ok};

    fn service() -> (Arc<MemoryStore>, PersonService) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), PersonService::new(store))
    }

    fn draft(first: &str, last: &str, email: &str) -> PersonDraft {
        PersonDraft {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            email: Some(email.to_string()),
            alias: None,
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_names_but_not_email() {
        let (_, people) = service();
        let jane = assert_ok!(people.create(draft("Jane", "Doe", "Jane@Example.com")).await);
        assert_eq!(jane.first_name, "JANE");
        assert_eq!(jane.last_name, "DOE");
        assert_eq!(jane.email, "Jane@Example.com");
        assert_eq!(assert_ok!(people.get(jane.id).await), jane);
    }

    #[tokio::test]
    async fn test_email_compared_verbatim() {
        let (_, people) = service();
        assert_ok!(people.create(draft("Jane", "Doe", "jane@example.com")).await);
        assert_ok!(people.create(draft("Jane", "Doe", "JANE@example.com")).await);
        let err = assert_err!(people.create(draft("Other", "Person", "jane@example.com")).await);
        assert!(matches!(err, LibraryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let (_, people) = service();
        let err = assert_err!(people.create(draft("Jane", "Doe", "not-an-email")).await);
        assert!(matches!(err, LibraryError::InvalidInput(_)));

        let mut no_email = draft("Jane", "Doe", "");
        no_email.email = None;
        let err = assert_err!(people.create(no_email).await);
        assert!(matches!(err, LibraryError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_missing_names_rejected_after_email_checks() {
        let (_, people) = service();
        let mut nameless = draft("", "Doe", "jane@example.com");
        let err = assert_err!(people.create(nameless.clone()).await);
        assert!(matches!(err, LibraryError::InvalidInput(ref m) if m == "Faltan datos"));

        // Format error wins over the missing name
        nameless.email = Some("broken".to_string());
        let err = assert_err!(people.create(nameless).await);
        assert!(matches!(err, LibraryError::InvalidInput(ref m) if m != "Faltan datos"));
    }

    #[tokio::test]
    async fn test_uniqueness_checked_before_format() {
        let (store, people) = service();
        // Seed a malformed address directly, bypassing validation
        assert_ok!(
            store
                .insert_person(&NewPerson {
                    first_name: "LEGACY".to_string(),
                    last_name: "ROW".to_string(),
                    email: "legacy-row".to_string(),
                    alias: None,
                })
                .await
        );

        let err = assert_err!(people.create(draft("Jane", "Doe", "legacy-row")).await);
        assert!(matches!(err, LibraryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let (_, people) = service();
        let jane = assert_ok!(people.create(draft("Jane", "Doe", "jane@example.com")).await);

        let mut changes = draft("janet", "smith", "janet@example.com");
        changes.alias = Some("JS".to_string());
        let updated = assert_ok!(people.update(jane.id, changes).await);

        assert_eq!(updated.first_name, "JANET");
        assert_eq!(updated.last_name, "SMITH");
        assert_eq!(updated.email, "janet@example.com");
        assert_eq!(updated.alias.as_deref(), Some("JS"));
        assert_eq!(assert_ok!(people.get(jane.id).await), updated);
    }

    #[tokio::test]
    async fn test_update_skips_email_format_check() {
        let (_, people) = service();
        let jane = assert_ok!(people.create(draft("Jane", "Doe", "jane@example.com")).await);
        let updated = assert_ok!(people.update(jane.id, draft("Jane", "Doe", "no-at-sign")).await);
        assert_eq!(updated.email, "no-at-sign");
    }

    #[tokio::test]
    async fn test_update_missing_person() {
        let (_, people) = service();
        let err = assert_err!(people.update(7, draft("Jane", "Doe", "jane@example.com")).await);
        assert!(matches!(err, LibraryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_guarded_by_held_books() {
        let (store, people) = service();
        let jane = assert_ok!(people.create(draft("Jane", "Doe", "jane@example.com")).await);
        let john = assert_ok!(people.create(draft("John", "Roe", "john@example.com")).await);
        let category_id = assert_ok!(store.insert_category("FICTION").await);
        assert_ok!(
            store
                .insert_book(&NewBook {
                    name: "DUNE".to_string(),
                    description: None,
                    category_id,
                    holder_id: Some(jane.id),
                })
                .await
        );

        let err = assert_err!(people.delete(jane.id).await);
        assert!(matches!(err, LibraryError::Conflict(_)));

        assert_ok!(people.delete(john.id).await);
        let err = assert_err!(people.get(john.id).await);
        assert!(matches!(err, LibraryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_to_taken_email_is_a_conflict() {
        let (_, people) = service();
        assert_ok!(people.create(draft("Jane", "Doe", "jane@example.com")).await);
        let john = assert_ok!(people.create(draft("John", "Roe", "john@example.com")).await);

        let err = assert_err!(people.update(john.id, draft("John", "Roe", "jane@example.com")).await);
        assert!(matches!(
            err,
            LibraryError::Conflict(ref m) if m == "La operación viola una restricción de integridad"
        ));
        assert_eq!(assert_ok!(people.get(john.id).await).email, "john@example.com");
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_unavailable() {
        let people = PersonService::new(Arc::new(UnavailableStore::new("down")));

        let err = assert_err!(people.list().await);
        assert!(matches!(err, LibraryError::StoreUnavailable(ref m) if m == "down"));

        let err = assert_err!(people.create(draft("Jane", "Doe", "jane@example.com")).await);
        assert!(matches!(err, LibraryError::StoreUnavailable(_)));
    }
}
