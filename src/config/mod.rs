use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub backend: BackendConfig,
    pub tables: TableConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL of the hosted service, e.g. `https://xyz.example.co`
    pub url: Option<String>,
    /// Public (anon) key sent as both `apikey` and bearer token
    pub anon_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub users: String,
    pub pdvs: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_requests: bool,
    pub log_dropped_references: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Backend overrides
        if let Ok(v) = env::var("BACKEND_URL") {
            self.backend.url = Some(v.trim_end_matches('/').to_string()).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("BACKEND_ANON_KEY") {
            self.backend.anon_key = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("BACKEND_TIMEOUT_SECS") {
            self.backend.timeout_secs = parse_timeout(&v).unwrap_or(self.backend.timeout_secs);
        }

        // Table overrides
        if let Ok(v) = env::var("BACKEND_USERS_TABLE") {
            self.tables.users = v;
        }
        if let Ok(v) = env::var("BACKEND_PDVS_TABLE") {
            self.tables.pdvs = v;
        }

        // Logging overrides
        if let Ok(v) = env::var("LOG_REQUESTS") {
            self.logging.log_requests = v.parse().unwrap_or(self.logging.log_requests);
        }
        if let Ok(v) = env::var("LOG_DROPPED_REFERENCES") {
            self.logging.log_dropped_references = v.parse().unwrap_or(self.logging.log_dropped_references);
        }

        self
    }

    /// Backend URL, or a config error naming the variable to set
    pub fn backend_url(&self) -> Result<&str, crate::error::AdminError> {
        self.backend
            .url
            .as_deref()
            .ok_or_else(|| crate::error::AdminError::config("BACKEND_URL is not set"))
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            backend: BackendConfig {
                url: None,
                anon_key: None,
                timeout_secs: 30,
            },
            tables: TableConfig::default(),
            logging: LoggingConfig {
                log_requests: true,
                log_dropped_references: true,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            backend: BackendConfig {
                url: None,
                anon_key: None,
                timeout_secs: 15,
            },
            tables: TableConfig::default(),
            logging: LoggingConfig {
                log_requests: true,
                log_dropped_references: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            backend: BackendConfig {
                url: None,
                anon_key: None,
                timeout_secs: 10,
            },
            tables: TableConfig::default(),
            logging: LoggingConfig {
                log_requests: false,
                log_dropped_references: true,
            },
        }
    }
}

/// Whole seconds, above zero
fn parse_timeout(raw: &str) -> Option<u64> {
    raw.trim().parse().ok().filter(|secs| *secs > 0)
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            users: "usuarios".to_string(),
            pdvs: "pdvs".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
