use serde_json::Value;

use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo};

pub struct FilterWhere;

impl FilterWhere {
    /// One `(column, "op.value")` query pair per condition
    pub fn generate(conditions: &[FilterWhereInfo]) -> Result<Vec<(String, String)>, FilterError> {
        conditions
            .iter()
            .map(|c| Ok((c.column.clone(), Self::build_condition(c)?)))
            .collect()
    }

    fn build_condition(condition: &FilterWhereInfo) -> Result<String, FilterError> {
        // `eq.null` would compare against the text "null"
        if condition.data.is_null() {
            return Ok("is.null".to_string());
        }

        let value = Self::format_value(&condition.column, &condition.data)?;
        Ok(format!("{}.{}", condition.operator.to_param(), value))
    }

    fn format_value(column: &str, data: &Value) -> Result<String, FilterError> {
        match data {
            Value::String(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Null => Ok("null".to_string()),
            Value::Array(_) | Value::Object(_) => Err(FilterError::InvalidValue {
                column: column.to_string(),
                reason: "equality filters take scalar values".to_string(),
            }),
        }
    }
}
