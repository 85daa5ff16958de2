//! In-memory stand-ins for the hosted backend, used by the service tests

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::backend::{AuthApi, TableApi};
use crate::error::{AdminError, AdminResult};
use crate::filter::{Filter, SortDirection};

/// Collections kept as JSON rows, with just enough filtering for the services
#[derive(Default)]
pub struct MemoryTables {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    last_patch: Mutex<Option<Value>>,
    failure: Mutex<Option<(u16, String)>>,
}

impl MemoryTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables.lock().unwrap().get(table).cloned().unwrap_or_default()
    }

    /// Body of the most recent update request
    pub fn last_patch(&self) -> Option<Value> {
        self.last_patch.lock().unwrap().clone()
    }

    /// Every following call answers with this backend error
    pub fn fail_with(&self, status: u16, message: &str) {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
    }

    fn check_failure(&self) -> AdminResult<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some((status, message)) => Err(AdminError::backend(*status, message.clone(), None)),
            None => Ok(()),
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn row_matches(row: &Value, filter: &Filter) -> bool {
    filter.conditions().iter().all(|condition| {
        let stored = row.get(&condition.column).unwrap_or(&Value::Null);
        if condition.data.is_null() {
            stored.is_null()
        } else {
            !stored.is_null() && text(stored) == text(&condition.data)
        }
    })
}

fn compare_rows(a: &Value, b: &Value, filter: &Filter) -> Ordering {
    for info in filter.ordering() {
        let left = a.get(&info.column).map(text).unwrap_or_default();
        let right = b.get(&info.column).map(text).unwrap_or_default();
        let ordering = match info.sort {
            SortDirection::Asc => left.cmp(&right),
            SortDirection::Desc => right.cmp(&left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn same_id(row: &Value, id: Uuid) -> bool {
    row.get("id").map(text).is_some_and(|stored| stored.eq_ignore_ascii_case(&id.to_string()))
}

#[async_trait]
impl TableApi for MemoryTables {
    async fn select(&self, table: &str, filter: &Filter) -> AdminResult<Vec<Value>> {
        self.check_failure()?;
        let mut rows: Vec<Value> = self.rows(table).into_iter().filter(|row| row_matches(row, filter)).collect();
        rows.sort_by(|a, b| compare_rows(a, b, filter));
        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Value) -> AdminResult<Vec<Value>> {
        self.check_failure()?;
        if let Value::Object(map) = &mut row {
            map.entry("id").or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        }
        self.tables.lock().unwrap().entry(table.to_string()).or_default().push(row.clone());
        Ok(vec![row])
    }

    async fn update(&self, table: &str, id: Uuid, patch: Value) -> AdminResult<Vec<Value>> {
        self.check_failure()?;
        *self.last_patch.lock().unwrap() = Some(patch.clone());

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|row| same_id(row, id)) {
            if let (Value::Object(stored), Value::Object(changes)) = (&mut *row, &patch) {
                for (key, value) in changes {
                    stored.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, id: Uuid) -> AdminResult<()> {
        self.check_failure()?;
        if let Some(rows) = self.tables.lock().unwrap().get_mut(table) {
            rows.retain(|row| !same_id(row, id));
        }
        Ok(())
    }
}

/// Auth service that hands out fresh ids and remembers who signed up
#[derive(Default)]
pub struct MemoryAuth {
    accounts: Mutex<Vec<(String, Uuid)>>,
    failure: Mutex<Option<String>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accounts(&self) -> Vec<(String, Uuid)> {
        self.accounts.lock().unwrap().clone()
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl AuthApi for MemoryAuth {
    async fn sign_up(&self, email: &str, _password: &str, _metadata: Value) -> AdminResult<Uuid> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(AdminError::auth(message));
        }
        let id = Uuid::new_v4();
        self.accounts.lock().unwrap().push((email.to_string(), id));
        Ok(id)
    }
}
