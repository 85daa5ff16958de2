use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde_json::Value;
use uuid::Uuid;

use super::{BackendSettings, ErrorBody};
use crate::error::{AdminError, AdminResult};
use crate::filter::filter::validate_table_name;
use crate::filter::Filter;
use crate::types::Operation;

/// Row-level access to named collections of the hosted table API
#[async_trait]
pub trait TableApi: Send + Sync {
    /// Rows matching the filter, in the filter's order
    async fn select(&self, table: &str, filter: &Filter) -> AdminResult<Vec<Value>>;

    /// Inserts one row and returns what the backend stored
    async fn insert(&self, table: &str, row: Value) -> AdminResult<Vec<Value>>;

    /// Partial update of the row whose `id` equals `id`
    async fn update(&self, table: &str, id: Uuid, patch: Value) -> AdminResult<Vec<Value>>;

    async fn delete(&self, table: &str, id: Uuid) -> AdminResult<()>;
}

#[async_trait]
impl<T: TableApi + ?Sized> TableApi for std::sync::Arc<T> {
    async fn select(&self, table: &str, filter: &Filter) -> AdminResult<Vec<Value>> {
        (**self).select(table, filter).await
    }

    async fn insert(&self, table: &str, row: Value) -> AdminResult<Vec<Value>> {
        (**self).insert(table, row).await
    }

    async fn update(&self, table: &str, id: Uuid, patch: Value) -> AdminResult<Vec<Value>> {
        (**self).update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: Uuid) -> AdminResult<()> {
        (**self).delete(table, id).await
    }
}

/// `TableApi` over the hosted service's REST endpoint (`/rest/v1/{table}`)
#[derive(Debug, Clone)]
pub struct RestTableClient {
    settings: BackendSettings,
    http: reqwest::Client,
}

impl RestTableClient {
    pub fn new(settings: BackendSettings) -> AdminResult<Self> {
        let http = settings.http_client()?;
        Ok(Self { settings, http })
    }

    fn table_url(&self, table: &str) -> AdminResult<String> {
        validate_table_name(table)?;
        Ok(format!("{}/rest/v1/{}", self.settings.base_url(), table))
    }

    fn id_filter(id: Uuid) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }

    fn log(&self, operation: Operation, table: &str) {
        if self.settings.log_requests {
            tracing::debug!("{} on '{}'", operation, table);
        }
    }

    /// Reads the rows out of a response, or turns an error body into `AdminError::Backend`
    async fn read_rows(operation: Operation, table: &str, response: reqwest::Response) -> AdminResult<Vec<Value>> {
        if !response.status().is_success() {
            let body = ErrorBody::from_response(response).await;
            tracing::error!("{} on '{}' failed ({}): {}", operation, table, body.status, body.message);
            return Err(AdminError::backend(body.status, body.message, body.code));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(vec![]);
        }

        match serde_json::from_str::<Value>(&text)? {
            Value::Array(rows) => Ok(rows),
            row @ Value::Object(_) => Ok(vec![row]),
            _ => Ok(vec![]),
        }
    }
}

fn return_representation() -> HeaderValue {
    HeaderValue::from_static("return=representation")
}

#[async_trait]
impl TableApi for RestTableClient {
    async fn select(&self, table: &str, filter: &Filter) -> AdminResult<Vec<Value>> {
        let url = self.table_url(table)?;
        let params = filter.to_params()?;
        self.log(Operation::Select, table);

        let response = self.http.get(url).query(&params).send().await?;
        Self::read_rows(Operation::Select, table, response).await
    }

    async fn insert(&self, table: &str, row: Value) -> AdminResult<Vec<Value>> {
        let url = self.table_url(table)?;
        self.log(Operation::Insert, table);

        let response = self
            .http
            .post(url)
            .header("Prefer", return_representation())
            .json(&row)
            .send()
            .await?;
        Self::read_rows(Operation::Insert, table, response).await
    }

    async fn update(&self, table: &str, id: Uuid, patch: Value) -> AdminResult<Vec<Value>> {
        let url = self.table_url(table)?;
        self.log(Operation::Update, table);

        let response = self
            .http
            .patch(url)
            .query(&Self::id_filter(id))
            .header("Prefer", return_representation())
            .json(&patch)
            .send()
            .await?;
        Self::read_rows(Operation::Update, table, response).await
    }

    async fn delete(&self, table: &str, id: Uuid) -> AdminResult<()> {
        let url = self.table_url(table)?;
        self.log(Operation::Delete, table);

        let response = self.http.delete(url).query(&Self::id_filter(id)).send().await?;
        Self::read_rows(Operation::Delete, table, response).await?;
        Ok(())
    }
}
