use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOp, FilterOrderInfo, FilterWhereInfo, SortDirection};

/// Select query against one collection of the hosted table API.
///
/// Renders to the query string pairs the REST layer expects:
/// `select=*&order=nome.asc&cargo=eq.supervisor`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    where_data: Vec<FilterWhereInfo>,
    order_data: Vec<FilterOrderInfo>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Result<Self, FilterError> {
        let column = column.into();
        validate_column(&column)?;
        self.where_data.push(FilterWhereInfo { column, operator: FilterOp::Eq, data: value.into() });
        Ok(self)
    }

    pub fn order(mut self, column: impl Into<String>, sort: SortDirection) -> Result<Self, FilterError> {
        let column = column.into();
        validate_column(&column)?;
        self.order_data.push(FilterOrderInfo { column, sort });
        Ok(self)
    }

    /// Appends orderings parsed from text such as `"nome asc, created_at desc"`
    pub fn order_by(mut self, order: &str) -> Result<Self, FilterError> {
        self.order_data.extend(FilterOrder::parse_order_string(order)?);
        Ok(self)
    }

    pub fn conditions(&self) -> &[FilterWhereInfo] {
        &self.where_data
    }

    pub fn ordering(&self) -> &[FilterOrderInfo] {
        &self.order_data
    }

    pub fn to_params(&self) -> Result<Vec<(String, String)>, FilterError> {
        let mut params = Vec::with_capacity(self.where_data.len() + 2);
        params.push(("select".to_string(), "*".to_string()));

        if let Some(order) = FilterOrder::generate(&self.order_data) {
            params.push(("order".to_string(), order));
        }

        params.extend(FilterWhere::generate(&self.where_data)?);
        Ok(params)
    }
}

/// Column names travel in the query string unescaped, so only plain identifiers pass
pub fn validate_column(name: &str) -> Result<(), FilterError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(FilterError::InvalidColumn(name.to_string()))
    }
}

pub fn validate_table_name(name: &str) -> Result<(), FilterError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(FilterError::InvalidTableName(name.to_string()))
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 63
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}
