use std::num::ParseIntError;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryParamError {
    /// Names the query parameter, or the offending token/value inside it.
    #[error("invalid {0} parameter")]
    InvalidParameter(String),

    #[error("invalid {param} parameter: {source}")]
    Parse {
        param: &'static str,
        #[source]
        source: ParseIntError,
    },
}

impl QueryParamError {
    pub fn invalid(name: impl Into<String>) -> Self {
        QueryParamError::InvalidParameter(name.into())
    }
}
