use serde_json::Value;
use uuid::Uuid;

use super::{first_row, into_object, parse_rows, prepare_write};
use crate::backend::{AuthApi, TableApi};
use crate::error::{AdminError, AdminResult};
use crate::filter::{Filter, SortDirection};
use crate::models::{search, Cargo, NovoUsuario, Usuario};

/// User management over the `usuarios` collection and the auth service
pub struct UserService<T, A> {
    table: T,
    auth: A,
    collection: String,
}

impl<T: TableApi, A: AuthApi> UserService<T, A> {
    /// Relationship fields that must hold a valid id before they are written
    pub const REFERENCE_FIELDS: &'static [&'static str] = &["supervisor_id"];

    pub fn new(table: T, auth: A) -> Self {
        Self {
            table,
            auth,
            collection: crate::config::config().tables.users.clone(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Ordering used when the caller does not pick one
    pub const DEFAULT_ORDER: &'static str = "nome asc";

    pub async fn list(&self) -> AdminResult<Vec<Usuario>> {
        self.list_ordered(Self::DEFAULT_ORDER).await
    }

    /// All users, ordered by text such as `"cargo asc, nome asc"`
    pub async fn list_ordered(&self, order: &str) -> AdminResult<Vec<Usuario>> {
        let filter = Filter::new().order_by(order)?;
        let rows = self.table.select(&self.collection, &filter).await?;
        parse_rows(rows)
    }

    pub async fn get(&self, id: Uuid) -> AdminResult<Usuario> {
        let filter = Filter::new().eq("id", id.to_string())?;
        let rows = self.table.select(&self.collection, &filter).await?;
        first_row(rows, || AdminError::not_found(format!("User {} not found", id)))
    }

    /// Users that can be picked as someone's supervisor
    pub async fn list_supervisors(&self) -> AdminResult<Vec<Usuario>> {
        let filter = Filter::new()
            .eq("cargo", Cargo::Supervisor.as_str())?
            .order("nome", SortDirection::Asc)?;
        let rows = self.table.select(&self.collection, &filter).await?;
        parse_rows(rows)
    }

    /// Creates the account first, then the `usuarios` row keyed by the account id.
    /// Nothing is inserted when sign-up fails.
    pub async fn create(&self, novo: NovoUsuario) -> AdminResult<Usuario> {
        novo.validate()?;

        let id = self
            .auth
            .sign_up(novo.email.trim(), &novo.senha, novo.metadata())
            .await?;
        tracing::info!("Created account {} for {}", id, novo.email.trim());

        let mut row = prepare_write(&self.collection, novo.row(id), Self::REFERENCE_FIELDS)?;
        // prepare_write drops the id along with the other system fields
        row.insert("id".into(), Value::String(id.to_string()));

        let rows = self.table.insert(&self.collection, Value::Object(row.clone())).await?;
        match rows.into_iter().next() {
            Some(stored) => Ok(serde_json::from_value(stored)?),
            // row-level security may hide the inserted row from the caller
            None => Ok(serde_json::from_value(Value::Object(row))?),
        }
    }

    /// Partial update. A malformed `supervisor_id` is left out of the request so the stored
    /// value stays as it is; every other field is sent unchanged.
    pub async fn update(&self, id: Uuid, patch: Value) -> AdminResult<Usuario> {
        let patch = prepare_write(&self.collection, into_object(patch)?, Self::REFERENCE_FIELDS)?;
        if patch.is_empty() {
            return Err(AdminError::validation("Nothing to update"));
        }

        let rows = self.table.update(&self.collection, id, Value::Object(patch)).await?;
        first_row(rows, || AdminError::not_found(format!("User {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AdminResult<()> {
        self.table.delete(&self.collection, id).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    /// In-memory narrowing of an already loaded list
    pub fn search<'a>(&self, usuarios: &'a [Usuario], term: &str) -> Vec<&'a Usuario> {
        search(usuarios, term)
    }
}
