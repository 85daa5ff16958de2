use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{BackendSettings, ErrorBody};
use crate::error::{AdminError, AdminResult};

/// Account creation on the hosted authentication service
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Creates an account and returns its id, which becomes the user's primary key.
    /// `metadata` is attached to the account as profile data.
    async fn sign_up(&self, email: &str, password: &str, metadata: Value) -> AdminResult<Uuid>;
}

#[async_trait]
impl<A: AuthApi + ?Sized> AuthApi for std::sync::Arc<A> {
    async fn sign_up(&self, email: &str, password: &str, metadata: Value) -> AdminResult<Uuid> {
        (**self).sign_up(email, password, metadata).await
    }
}

#[derive(Debug, Clone)]
pub struct RestAuthClient {
    settings: BackendSettings,
    http: reqwest::Client,
}

impl RestAuthClient {
    pub fn new(settings: BackendSettings) -> AdminResult<Self> {
        let http = settings.http_client()?;
        Ok(Self { settings, http })
    }

    fn signup_url(&self) -> String {
        format!("{}/auth/v1/signup", self.settings.base_url())
    }
}

/// The account id sits under `user` when confirmation is pending and at the top level otherwise
fn account_id(body: &Value) -> AdminResult<Uuid> {
    let id = body
        .pointer("/user/id")
        .or_else(|| body.get("id"))
        .and_then(Value::as_str)
        .ok_or_else(|| AdminError::auth("Sign-up response did not include an account id"))?;

    Uuid::parse_str(id).map_err(|_| AdminError::auth(format!("Sign-up returned a malformed account id: {}", id)))
}

#[async_trait]
impl AuthApi for RestAuthClient {
    async fn sign_up(&self, email: &str, password: &str, metadata: Value) -> AdminResult<Uuid> {
        if self.settings.log_requests {
            tracing::debug!("sign-up for {}", email);
        }

        let response = self
            .http
            .post(self.signup_url())
            .json(&json!({
                "email": email,
                "password": password,
                "data": metadata,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = ErrorBody::from_response(response).await;
            tracing::error!("sign-up for {} failed ({}): {}", email, body.status, body.message);
            return Err(AdminError::auth(body.message));
        }

        let body: Value = response.json().await?;
        account_id(&body)
    }
}
