use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{default_true, require_text, Searchable};
use crate::error::{AdminError, AdminResult};

/// Minimum password length accepted by the hosted auth service
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cargo {
    Admin,
    Supervisor,
    #[default]
    Promotor,
    Parceiro,
    /// Role stored by some other client that this tool does not manage
    #[serde(other)]
    Desconhecido,
}

impl Cargo {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cargo::Admin => "admin",
            Cargo::Supervisor => "supervisor",
            Cargo::Promotor => "promotor",
            Cargo::Parceiro => "parceiro",
            Cargo::Desconhecido => "desconhecido",
        }
    }
}

impl std::fmt::Display for Cargo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Cargo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Cargo::Admin),
            "supervisor" => Ok(Cargo::Supervisor),
            "promotor" => Ok(Cargo::Promotor),
            "parceiro" => Ok(Cargo::Parceiro),
            other => Err(format!("unknown role '{}' (admin, supervisor, promotor, parceiro)", other)),
        }
    }
}

/// Row of the `usuarios` collection. `id` is the account id issued by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    #[serde(default)]
    pub cargo: Cargo,
    /// Who this user reports to
    #[serde(default)]
    pub supervisor_id: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default = "default_true")]
    pub ativo: bool,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Searchable for Usuario {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.nome.as_str(), self.email.as_str(), self.cargo.as_str()];
        if let Some(telefone) = &self.telefone {
            fields.push(telefone);
        }
        fields
    }
}

/// Input of the "new user" form. The password goes to the auth service only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NovoUsuario {
    pub nome: String,
    pub email: String,
    pub senha: String,
    #[serde(default)]
    pub cargo: Cargo,
    #[serde(default)]
    pub supervisor_id: Option<Value>,
    #[serde(default)]
    pub telefone: Option<String>,
}

impl NovoUsuario {
    pub fn validate(&self) -> AdminResult<()> {
        require_text("nome", &self.nome)?;
        require_text("email", &self.email)?;
        if self.cargo == Cargo::Desconhecido {
            return Err(AdminError::field("cargo", "cargo must be admin, supervisor, promotor or parceiro"));
        }
        if !self.email.contains('@') {
            return Err(AdminError::field("email", "email must be an address"));
        }
        if self.senha.chars().count() < MIN_PASSWORD_LEN {
            return Err(AdminError::field(
                "senha",
                format!("senha must have at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        Ok(())
    }

    /// Profile data attached to the account at sign-up
    pub fn metadata(&self) -> Value {
        json!({
            "nome": self.nome.trim(),
            "cargo": self.cargo,
        })
    }

    /// Row inserted into `usuarios` once the account exists. Reference fields are
    /// copied raw here; the service sanitizes them before sending.
    pub fn row(&self, id: Uuid) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("id".into(), json!(id));
        row.insert("nome".into(), json!(self.nome.trim()));
        row.insert("email".into(), json!(self.email.trim()));
        row.insert("cargo".into(), json!(self.cargo));
        if let Some(supervisor_id) = &self.supervisor_id {
            row.insert("supervisor_id".into(), supervisor_id.clone());
        }
        if let Some(telefone) = self.telefone.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            row.insert("telefone".into(), json!(telefone));
        }
        row.insert("ativo".into(), json!(true));
        row
    }
}
