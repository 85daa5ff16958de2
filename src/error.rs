// Admin error types
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::filter::error::FilterError;

/// Errors surfaced to the operator by the user and point-of-sale flows
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // Rejected before anything was sent
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },

    #[error("{0}")]
    NotFound(String),

    // Hosted table API answered with an error body
    #[error("{message}")]
    Backend {
        status: u16,
        message: String,
        code: Option<String>,
    },

    // Hosted authentication service refused the request
    #[error("{0}")]
    Auth(String),

    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl AdminError {
    /// HTTP-like status for the failure (backend errors keep the status they came with)
    pub fn status_code(&self) -> u16 {
        match self {
            AdminError::Validation { .. } => 400,
            AdminError::NotFound(_) => 404,
            AdminError::Backend { status, .. } => *status,
            AdminError::Auth(_) => 401,
            AdminError::Config(_) => 500,
            AdminError::Http(e) => e.status().map(|s| s.as_u16()).unwrap_or(502),
            AdminError::Json(_) => 400,
            AdminError::Filter(_) => 400,
        }
    }

    /// Message shown to the operator
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Validation { .. } => "VALIDATION_ERROR",
            AdminError::NotFound(_) => "NOT_FOUND",
            AdminError::Backend { .. } => "BACKEND_ERROR",
            AdminError::Auth(_) => "AUTH_ERROR",
            AdminError::Config(_) => "CONFIG_ERROR",
            AdminError::Http(_) => "HTTP_ERROR",
            AdminError::Json(_) => "INVALID_JSON",
            AdminError::Filter(_) => "INVALID_FILTER",
        }
    }

    /// Convert to JSON body for `--json` output
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "success": false,
            "error": self.message(),
            "error_code": self.error_code(),
        });

        match self {
            AdminError::Validation { field_errors: Some(field_errors), .. } => {
                response["field_errors"] = json!(field_errors);
            }
            AdminError::Backend { code: Some(code), .. } => {
                response["backend_code"] = json!(code);
            }
            _ => {}
        }

        response
    }
}

// Static constructor methods
impl AdminError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdminError::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn field(field: impl Into<String>, problem: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), problem.into());
        AdminError::Validation {
            message: "Invalid field value".to_string(),
            field_errors: Some(field_errors),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AdminError::NotFound(message.into())
    }

    pub fn backend(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        AdminError::Backend {
            status,
            message: message.into(),
            code,
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        AdminError::Auth(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        AdminError::Config(message.into())
    }
}

pub type AdminResult<T> = Result<T, AdminError>;
