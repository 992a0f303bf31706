use super::error::QueryParamError;
use super::types::{Column, ColumnKind, FilterOperator, FilterParam};

/// Renders filter parameters as a conjunctive WHERE predicate with `$n`
/// placeholders. Values are never interpolated into the SQL text.
pub struct FilterWhere<'a> {
    columns: &'a [Column],
    param_values: Vec<String>,
    param_index: usize,
}

impl<'a> FilterWhere<'a> {
    pub fn new(columns: &'a [Column], starting_param_index: usize) -> Self {
        Self {
            columns,
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Returns the predicate (without the `WHERE` keyword, empty when there
    /// are no filters) and the values to bind in placeholder order.
    pub fn generate(
        filters: &[FilterParam],
        columns: &'a [Column],
    ) -> Result<(String, Vec<String>), QueryParamError> {
        let mut filter_where = Self::new(columns, 0);
        let mut conditions = Vec::with_capacity(filters.len());
        for filter in filters {
            conditions.push(filter_where.build_condition(filter)?);
        }
        Ok((conditions.join(" AND "), filter_where.param_values))
    }

    fn build_condition(&mut self, filter: &FilterParam) -> Result<String, QueryParamError> {
        let column = lookup_column(self.columns, &filter.field)?;
        let quoted = quote_identifier(column.name);

        match filter.operator {
            FilterOperator::Eq
            | FilterOperator::Lt
            | FilterOperator::Gt
            | FilterOperator::Lte
            | FilterOperator::Gte => {
                let placeholder = self.param(column.kind, filter.value.clone());
                Ok(format!("{} {} {}", quoted, filter.operator.as_sql(), placeholder))
            }
            FilterOperator::Like => {
                let placeholder = self.param(ColumnKind::Text, filter.value.clone());
                Ok(format!("{}::text LIKE {}", quoted, placeholder))
            }
            FilterOperator::In | FilterOperator::NotIn => {
                let items: Vec<&str> = filter
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .collect();
                if items.is_empty() {
                    return Err(QueryParamError::invalid(filter.value.as_str()));
                }
                let placeholders: Vec<String> = items
                    .into_iter()
                    .map(|v| self.param(column.kind, v.to_string()))
                    .collect();
                let keyword = if filter.operator == FilterOperator::In { "IN" } else { "NOT IN" };
                Ok(format!("{} {} ({})", quoted, keyword, placeholders.join(", ")))
            }
            FilterOperator::Is => {
                let predicate = match filter.value.trim().to_ascii_lowercase().as_str() {
                    "null" => "IS NULL",
                    "not null" => "IS NOT NULL",
                    "true" => "IS TRUE",
                    "false" => "IS FALSE",
                    _ => return Err(QueryParamError::invalid(filter.value.as_str())),
                };
                Ok(format!("{} {}", quoted, predicate))
            }
        }
    }

    fn param(&mut self, kind: ColumnKind, value: String) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        match kind {
            ColumnKind::Text => format!("${}", self.param_index),
            other => format!("${}::{}", self.param_index, other.sql_type()),
        }
    }
}

pub(crate) fn lookup_column<'c>(columns: &'c [Column], field: &str) -> Result<&'c Column, QueryParamError> {
    columns
        .iter()
        .find(|c| c.name == field)
        .ok_or_else(|| QueryParamError::invalid(field))
}

pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
