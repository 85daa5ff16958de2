use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::{default_true, require_text, Searchable};
use crate::error::AdminResult;

/// Row of the `pdvs` collection (point of sale run by a partner, visited by a promoter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pdv {
    pub id: Uuid,
    pub nome: String,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub parceiro_id: Option<String>,
    #[serde(default)]
    pub promotor_id: Option<String>,
    #[serde(default = "default_true")]
    pub ativo: bool,
    #[serde(default, deserialize_with = "super::timestamp::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Searchable for Pdv {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.nome.as_str()];
        fields.extend(
            [&self.cnpj, &self.endereco, &self.cidade, &self.estado]
                .into_iter()
                .filter_map(|f| f.as_deref()),
        );
        fields
    }
}

/// Input of the "new point of sale" form; the backend assigns the id
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NovoPdv {
    pub nome: String,
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub parceiro_id: Option<Value>,
    #[serde(default)]
    pub promotor_id: Option<Value>,
}

impl NovoPdv {
    pub fn validate(&self) -> AdminResult<()> {
        require_text("nome", &self.nome)
    }

    /// Row for insertion; blank optional texts are left out, reference fields are raw
    pub fn row(&self) -> Map<String, Value> {
        let mut row = Map::new();
        row.insert("nome".into(), json!(self.nome.trim()));

        let texts = [
            ("cnpj", &self.cnpj),
            ("endereco", &self.endereco),
            ("cidade", &self.cidade),
            ("estado", &self.estado),
        ];
        for (key, value) in texts {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                row.insert(key.into(), json!(v));
            }
        }

        if let Some(parceiro_id) = &self.parceiro_id {
            row.insert("parceiro_id".into(), parceiro_id.clone());
        }
        if let Some(promotor_id) = &self.promotor_id {
            row.insert("promotor_id".into(), promotor_id.clone());
        }
        row.insert("ativo".into(), json!(true));
        row
    }
}
