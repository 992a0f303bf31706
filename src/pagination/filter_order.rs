use super::error::QueryParamError;
use super::filter_where::{lookup_column, quote_identifier};
use super::types::{Column, OrderParam};

pub struct FilterOrder;

impl FilterOrder {
    /// Renders `ORDER BY "col" ASC|DESC`, or an empty string when no valid
    /// sort token was supplied.
    pub fn generate(order: &OrderParam, columns: &[Column]) -> Result<String, QueryParamError> {
        let Some(direction) = order.order.filter(|_| !order.order_by.is_empty()) else {
            return Ok(String::new());
        };
        let column = lookup_column(columns, &order.order_by)?;
        Ok(format!("ORDER BY {} {}", quote_identifier(column.name), direction.to_sql()))
    }
}
