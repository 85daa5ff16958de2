//! In-process mock of the hosted backend (REST table API and auth sign-up) for the
//! integration tests. Every request is recorded so tests can assert on what was sent.

#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pdv_admin::backend::BackendSettings;
use serde_json::{json, Value};
use uuid::Uuid;

pub const ANON_KEY: &str = "test-anon-key";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub table: String,
    pub query: Vec<(String, String)>,
    pub prefer: Option<String>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
pub struct MockState {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    accounts: Mutex<Vec<String>>,
    requests: Mutex<Vec<RecordedRequest>>,
    failure: Mutex<Option<(StatusCode, Value)>>,
}

pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route(
                "/rest/v1/:table",
                get(select_rows).post(insert_rows).patch(update_rows).delete(delete_rows),
            )
            .route("/auth/v1/signup", post(sign_up))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind mock backend")?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        })
    }

    pub fn settings(&self) -> BackendSettings {
        BackendSettings::new(&self.base_url)
            .expect("mock url is valid")
            .with_anon_key(ANON_KEY)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self, method: Method) -> Option<RecordedRequest> {
        self.requests().into_iter().rev().find(|r| r.method == method)
    }

    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.state.tables.lock().unwrap().entry(table.to_string()).or_default().extend(rows);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.state.tables.lock().unwrap().get(table).cloned().unwrap_or_default()
    }

    /// Every following table request answers with this status and body
    pub fn fail_with(&self, status: StatusCode, body: Value) {
        *self.state.failure.lock().unwrap() = Some((status, body));
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    apikey == Some(ANON_KEY) && bearer == Some(format!("Bearer {}", ANON_KEY).as_str())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid API key" }))).into_response()
}

fn record(state: &MockState, method: Method, table: &str, query: &[(String, String)], headers: &HeaderMap, body: &Bytes) {
    let body = serde_json::from_slice(body).unwrap_or(Value::Null);
    let prefer = headers.get("prefer").and_then(|v| v.to_str().ok()).map(str::to_string);
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        table: table.to_string(),
        query: query.to_vec(),
        prefer,
        body,
    });
}

fn failure(state: &MockState) -> Option<Response> {
    state
        .failure
        .lock()
        .unwrap()
        .clone()
        .map(|(status, body)| (status, Json(body)).into_response())
}

fn row_matches(row: &Value, query: &[(String, String)]) -> bool {
    query
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "select" | "order"))
        .all(|(column, condition)| {
            let stored = row.get(column).unwrap_or(&Value::Null);
            match condition.split_once('.') {
                Some(("eq", value)) => !stored.is_null() && text(stored) == value,
                Some(("is", "null")) => stored.is_null(),
                _ => false,
            }
        })
}

fn order_rows(rows: &mut [Value], query: &[(String, String)]) {
    let Some((_, order)) = query.iter().find(|(k, _)| k == "order") else {
        return;
    };
    let keys: Vec<(String, bool)> = order
        .split(',')
        .filter_map(|part| part.split_once('.'))
        .map(|(column, dir)| (column.to_string(), dir == "desc"))
        .collect();

    rows.sort_by(|a, b| {
        for (column, desc) in &keys {
            let left = a.get(column).map(text).unwrap_or_default();
            let right = b.get(column).map(text).unwrap_or_default();
            let ordering = if *desc { right.cmp(&left) } else { left.cmp(&right) };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

async fn select_rows(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    record(&state, Method::GET, &table, &query, &headers, &Bytes::new());
    if let Some(response) = failure(&state) {
        return response;
    }

    let mut rows: Vec<Value> = state
        .tables
        .lock()
        .unwrap()
        .get(&table)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|row| row_matches(row, &query))
        .collect();
    order_rows(&mut rows, &query);

    Json(Value::Array(rows)).into_response()
}

async fn insert_rows(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    record(&state, Method::POST, &table, &[], &headers, &body);
    if let Some(response) = failure(&state) {
        return response;
    }

    let incoming = match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Array(rows)) => rows,
        Ok(row @ Value::Object(_)) => vec![row],
        _ => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "code": "PGRST102", "message": "Empty or invalid json" })))
                .into_response()
        }
    };

    let mut tables = state.tables.lock().unwrap();
    let stored = tables.entry(table.clone()).or_default();
    let mut inserted = Vec::new();

    for mut row in incoming {
        let email = row.get("email").cloned();
        if email.is_some() && stored.iter().any(|r| r.get("email") == email.as_ref()) {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "code": "23505",
                    "details": "Key (email) already exists.",
                    "hint": null,
                    "message": format!("duplicate key value violates unique constraint \"{}_email_key\"", table),
                })),
            )
                .into_response();
        }
        if let Value::Object(map) = &mut row {
            map.entry("id").or_insert_with(|| json!(Uuid::new_v4()));
            map.entry("created_at").or_insert_with(|| json!("2024-03-01T12:00:00+00:00"));
        }
        stored.push(row.clone());
        inserted.push(row);
    }

    (StatusCode::CREATED, Json(Value::Array(inserted))).into_response()
}

async fn update_rows(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    record(&state, Method::PATCH, &table, &query, &headers, &body);
    if let Some(response) = failure(&state) {
        return response;
    }

    let patch: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let mut tables = state.tables.lock().unwrap();
    let mut updated = Vec::new();

    for row in tables.entry(table).or_default().iter_mut() {
        if !row_matches(row, &query) {
            continue;
        }
        if let (Value::Object(stored), Value::Object(changes)) = (&mut *row, &patch) {
            for (key, value) in changes {
                stored.insert(key.clone(), value.clone());
            }
        }
        updated.push(row.clone());
    }

    Json(Value::Array(updated)).into_response()
}

async fn delete_rows(
    State(state): State<Arc<MockState>>,
    Path(table): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    record(&state, Method::DELETE, &table, &query, &headers, &Bytes::new());
    if let Some(response) = failure(&state) {
        return response;
    }

    if let Some(rows) = state.tables.lock().unwrap().get_mut(&table) {
        rows.retain(|row| !row_matches(row, &query));
    }

    StatusCode::NO_CONTENT.into_response()
}

async fn sign_up(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    record(&state, Method::POST, "auth/signup", &[], &headers, &body);

    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default().to_string();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    if password.chars().count() < 6 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "code": 422, "error_code": "weak_password", "msg": "Password should be at least 6 characters." })),
        )
            .into_response();
    }

    let mut accounts = state.accounts.lock().unwrap();
    if accounts.contains(&email) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "code": 422, "error_code": "user_already_exists", "msg": "User already registered" })),
        )
            .into_response();
    }
    accounts.push(email.clone());

    Json(json!({
        "user": {
            "id": Uuid::new_v4(),
            "email": email,
            "user_metadata": body.get("data").cloned().unwrap_or(Value::Null),
        },
        "session": null,
    }))
    .into_response()
}
