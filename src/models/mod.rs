pub mod pdv;
pub mod usuario;

pub use pdv::{NovoPdv, Pdv};
pub use usuario::{Cargo, NovoUsuario, Usuario};

/// Records the list screens can narrow down with a free-text term
pub trait Searchable {
    /// Texts the term is matched against
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match; an empty or blank term matches everything
    fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
    }
}

pub fn search<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches(term)).collect()
}

/// `created_at` as the table API sends it. `timestamptz` columns carry an offset; plain
/// `timestamp` columns do not and are read as UTC. Anything unreadable becomes `None`.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed = match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(raw)) => {
                let parsed = parse(&raw);
                if parsed.is_none() {
                    tracing::debug!("Ignoring unreadable timestamp '{}'", raw);
                }
                parsed
            }
            _ => None,
        };
        Ok(parsed)
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn require_text(field: &str, value: &str) -> crate::error::AdminResult<()> {
    if value.trim().is_empty() {
        return Err(crate::error::AdminError::field(field, format!("{} is required", field)));
    }
    Ok(())
}
