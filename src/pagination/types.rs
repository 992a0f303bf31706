use serde::{Deserialize, Serialize};

/// Raw list query string as received on GET endpoints.
///
/// Values are kept as text; [`super::parse_pagination_params`] turns them
/// into typed parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
    pub sort: Option<String>,
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationParam {
    pub page: i64,
    pub page_size: i64,
}

impl PaginationParam {
    /// Page size sentinel that disables LIMIT/OFFSET.
    pub const UNLIMITED: i64 = -1;

    pub fn is_unlimited(&self) -> bool {
        self.page_size == Self::UNLIMITED
    }

    pub fn offset(&self) -> i64 {
        if self.is_unlimited() {
            0
        } else {
            (self.page - 1).saturating_mul(self.page_size)
        }
    }
}

impl Default for PaginationParam {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: Self::UNLIMITED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderParam {
    pub order_by: String,
    pub order: Option<SortDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Lt,
    Gt,
    Lte,
    Gte,
    In,
    Like,
    Is,
    NotIn,
}

impl FilterOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "eq" => FilterOperator::Eq,
            "lt" => FilterOperator::Lt,
            "gt" => FilterOperator::Gt,
            "lte" => FilterOperator::Lte,
            "gte" => FilterOperator::Gte,
            "in" => FilterOperator::In,
            "like" => FilterOperator::Like,
            "is" => FilterOperator::Is,
            "not" => FilterOperator::NotIn,
            _ => return None,
        })
    }

    /// Relational operator as it appears in a WHERE predicate.
    pub fn as_sql(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Lt => "<",
            FilterOperator::Gt => ">",
            FilterOperator::Lte => "<=",
            FilterOperator::Gte => ">=",
            FilterOperator::In => "in",
            FilterOperator::Like => "like",
            FilterOperator::Is => "is",
            FilterOperator::NotIn => "not in",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterParam {
    pub field: String,
    pub value: String,
    pub operator: FilterOperator,
}

pub type FilterParams = Vec<FilterParam>;

/// Parsed list request handed from handlers to services.
#[derive(Debug, Clone, Default)]
pub struct ListReq {
    pub page: PaginationParam,
    pub order: OrderParam,
    pub filter: FilterParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Uuid,
    Boolean,
    Timestamp,
}

impl ColumnKind {
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Text => "text",
            ColumnKind::Integer => "bigint",
            ColumnKind::Uuid => "uuid",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Timestamp => "timestamptz",
        }
    }
}

/// A column that may appear in filter and sort parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}

/// Page metadata returned alongside list data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total_page: i64,
    pub total_data_per_page: i64,
    pub total_data: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData<T> {
    #[serde(flatten)]
    pub pagination: Pagination,
    pub data: Vec<T>,
}
