pub mod error;
pub mod filter_order;
pub mod filter_where;
pub mod paginate;
pub mod parser;
pub mod types;

pub use error::QueryParamError;
pub use parser::{parse_filter_params, parse_order_param, parse_page_limit_param, parse_pagination_params};
pub use types::*;
