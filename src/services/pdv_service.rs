use serde_json::Value;
use uuid::Uuid;

use super::{first_row, into_object, parse_rows, prepare_write};
use crate::backend::TableApi;
use crate::error::{AdminError, AdminResult};
use crate::filter::{Filter, SortDirection};
use crate::models::{search, NovoPdv, Pdv};

/// Point-of-sale management over the `pdvs` collection
pub struct PdvService<T> {
    table: T,
    collection: String,
}

impl<T: TableApi> PdvService<T> {
    /// Each one is sanitized on its own; a bad promoter never affects the partner
    pub const REFERENCE_FIELDS: &'static [&'static str] = &["promotor_id", "parceiro_id"];

    pub fn new(table: T) -> Self {
        Self {
            table,
            collection: crate::config::config().tables.pdvs.clone(),
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Ordering used when the caller does not pick one
    pub const DEFAULT_ORDER: &'static str = "nome asc";

    pub async fn list(&self) -> AdminResult<Vec<Pdv>> {
        self.list_ordered(Self::DEFAULT_ORDER).await
    }

    /// All rows, ordered by text such as `"cidade asc, nome asc"`
    pub async fn list_ordered(&self, order: &str) -> AdminResult<Vec<Pdv>> {
        let filter = Filter::new().order_by(order)?;
        let rows = self.table.select(&self.collection, &filter).await?;
        parse_rows(rows)
    }

    /// Points of sale assigned to one promoter
    pub async fn list_by_promotor(&self, promotor_id: Uuid) -> AdminResult<Vec<Pdv>> {
        let filter = Filter::new()
            .eq("promotor_id", promotor_id.to_string())?
            .order("nome", SortDirection::Asc)?;
        let rows = self.table.select(&self.collection, &filter).await?;
        parse_rows(rows)
    }

    pub async fn get(&self, id: Uuid) -> AdminResult<Pdv> {
        let filter = Filter::new().eq("id", id.to_string())?;
        let rows = self.table.select(&self.collection, &filter).await?;
        first_row(rows, || AdminError::not_found(format!("Point of sale {} not found", id)))
    }

    pub async fn create(&self, novo: NovoPdv) -> AdminResult<Pdv> {
        novo.validate()?;

        let row = prepare_write(&self.collection, novo.row(), Self::REFERENCE_FIELDS)?;
        let rows = self.table.insert(&self.collection, Value::Object(row)).await?;
        let pdv: Pdv = first_row(rows, || {
            AdminError::not_found("Point of sale was stored but is not visible to this key")
        })?;

        tracing::info!("Created point of sale {} ({})", pdv.id, pdv.nome);
        Ok(pdv)
    }

    pub async fn update(&self, id: Uuid, patch: Value) -> AdminResult<Pdv> {
        let patch = prepare_write(&self.collection, into_object(patch)?, Self::REFERENCE_FIELDS)?;
        if patch.is_empty() {
            return Err(AdminError::validation("Nothing to update"));
        }

        let rows = self.table.update(&self.collection, id, Value::Object(patch)).await?;
        first_row(rows, || AdminError::not_found(format!("Point of sale {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AdminResult<()> {
        self.table.delete(&self.collection, id).await?;
        tracing::info!("Deleted point of sale {}", id);
        Ok(())
    }

    pub fn search<'a>(&self, pdvs: &'a [Pdv], term: &str) -> Vec<&'a Pdv> {
        search(pdvs, term)
    }
}
