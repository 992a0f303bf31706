use once_cell::sync::Lazy;
use regex::Regex;

use super::error::QueryParamError;
use super::types::{
    FilterOperator, FilterParam, FilterParams, ListQuery, OrderParam, PaginationParam, SortDirection,
};

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "pageSize";
pub const ORDER_PARAM: &str = "sort";
pub const FILTER_PARAM: &str = "filter";

const DEFAULT_PAGE: &str = "1";
const DEFAULT_PAGE_SIZE: &str = "-1";

// Unanchored: a token only has to contain a match somewhere.
static ORDER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9_]+):([A-Za-z0-9_]+)").expect("order pattern compiles"));

static FILTER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z0-9_]+):([^|]+):([A-Za-z0-9_]+)").expect("filter pattern compiles")
});

/// Parse `page` and `pageSize`, applying the defaults 1 and -1 (unlimited).
pub fn parse_page_limit_param(
    page: Option<&str>,
    page_size: Option<&str>,
) -> Result<PaginationParam, QueryParamError> {
    let page = parse_int(PAGE_PARAM, page.unwrap_or(DEFAULT_PAGE))?;
    let page_size = parse_int(PAGE_SIZE_PARAM, page_size.unwrap_or(DEFAULT_PAGE_SIZE))?;

    if page < 1 {
        return Err(QueryParamError::invalid(PAGE_PARAM));
    }
    if page_size < PaginationParam::UNLIMITED {
        return Err(QueryParamError::invalid(PAGE_SIZE_PARAM));
    }

    Ok(PaginationParam { page, page_size })
}

fn parse_int(param: &'static str, raw: &str) -> Result<i64, QueryParamError> {
    raw.parse::<i64>()
        .map_err(|source| QueryParamError::Parse { param, source })
}

/// Parse a comma-separated list of `field:direction` tokens.
///
/// Only the last valid token is kept. Tokens that do not look like
/// `field:direction` are ignored; tokens that do but carry extra segments or
/// an unknown direction fail the whole parse.
pub fn parse_order_param(sort: Option<&str>) -> Result<OrderParam, QueryParamError> {
    let mut param = OrderParam::default();
    let Some(sort) = sort.filter(|s| !s.is_empty()) else {
        return Ok(param);
    };

    for token in sort.split(',') {
        if !ORDER_PATTERN.is_match(token) {
            continue;
        }
        let parts: Vec<&str> = token.split(':').collect();
        let [field, direction] = parts.as_slice() else {
            return Err(QueryParamError::invalid(ORDER_PARAM));
        };
        let direction =
            SortDirection::from_token(direction).ok_or_else(|| QueryParamError::invalid(*direction))?;

        param.order_by = field.to_string();
        param.order = Some(direction);
    }

    Ok(param)
}

/// Parse a pipe-separated list of `field:value:operator` triples.
pub fn parse_filter_params(filter: Option<&str>) -> Result<FilterParams, QueryParamError> {
    let mut params = FilterParams::new();
    let Some(filter) = filter.filter(|f| !f.is_empty()) else {
        return Ok(params);
    };

    for token in filter.split('|') {
        if !FILTER_PATTERN.is_match(token) {
            continue;
        }
        let parts: Vec<&str> = token.split(':').collect();
        let [field, value, operator] = parts.as_slice() else {
            return Err(QueryParamError::invalid(token));
        };
        let operator =
            FilterOperator::from_token(operator).ok_or_else(|| QueryParamError::invalid(*operator))?;

        params.push(FilterParam {
            field: field.to_string(),
            value: value.to_string(),
            operator,
        });
    }

    Ok(params)
}

/// Run the pagination, order and filter parsers in that order, stopping at
/// the first failure.
pub fn parse_pagination_params(
    query: &ListQuery,
) -> Result<(PaginationParam, OrderParam, FilterParams), QueryParamError> {
    let page = parse_page_limit_param(query.page.as_deref(), query.page_size.as_deref())?;
    let order = parse_order_param(query.sort.as_deref())?;
    let filters = parse_filter_params(query.filter.as_deref())?;
    Ok((page, order, filters))
}
