use super::types::{Pagination, PaginationData, PaginationParam};

/// Page size actually applied, after the configured maximum.
pub fn effective_page_size(param: &PaginationParam, max_page_size: Option<i64>) -> i64 {
    match max_page_size {
        Some(max) if !param.is_unlimited() && param.page_size > max => {
            if crate::config::CONFIG.pagination.debug_logging {
                tracing::warn!("Page size {} exceeds max {}, capping to max", param.page_size, max);
            }
            max
        }
        _ => param.page_size,
    }
}

/// Applies the configured maximum page size to a parsed pagination request.
pub fn capped(param: PaginationParam) -> PaginationParam {
    // Startup validation rejects a malformed cap.
    let max_page_size = crate::config::config().max_page_size().ok().flatten();
    let page_size = effective_page_size(&param, max_page_size);
    PaginationParam { page: param.page, page_size }
}

/// `LIMIT n OFFSET m`, or nothing for unlimited requests.
pub fn build_limit_clause(param: &PaginationParam) -> String {
    if param.is_unlimited() {
        String::new()
    } else {
        format!("LIMIT {} OFFSET {}", param.page_size, param.offset())
    }
}

fn total_pages(page_size: i64, total_data: i64) -> i64 {
    if total_data <= 0 || page_size == 0 {
        0
    } else if page_size == PaginationParam::UNLIMITED {
        1
    } else {
        total_data / page_size + i64::from(total_data % page_size != 0)
    }
}

impl Pagination {
    pub fn new(param: &PaginationParam, total_data_per_page: i64, total_data: i64) -> Self {
        Self {
            page: param.page,
            page_size: param.page_size,
            total_page: total_pages(param.page_size, total_data),
            total_data_per_page,
            total_data,
        }
    }
}

impl<T> PaginationData<T> {
    pub fn new(param: &PaginationParam, data: Vec<T>, total_data: i64) -> Self {
        Self {
            pagination: Pagination::new(param, data.len() as i64, total_data),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: i64, page_size: i64) -> PaginationParam {
        PaginationParam { page, page_size }
    }

    #[test]
    fn limit_clause() {
        assert_eq!(build_limit_clause(&PaginationParam::default()), "");
        assert_eq!(build_limit_clause(&page(1, 10)), "LIMIT 10 OFFSET 0");
        assert_eq!(build_limit_clause(&page(3, 20)), "LIMIT 20 OFFSET 40");
        assert_eq!(build_limit_clause(&page(2, 0)), "LIMIT 0 OFFSET 0");
    }

    #[test]
    fn page_size_cap() {
        assert_eq!(effective_page_size(&page(1, 500), Some(100)), 100);
        assert_eq!(effective_page_size(&page(1, 50), Some(100)), 50);
        assert_eq!(effective_page_size(&page(1, -1), Some(100)), -1);
        assert_eq!(effective_page_size(&page(1, 500), None), 500);
    }

    #[test]
    fn total_page_math() {
        assert_eq!(Pagination::new(&page(1, 10), 10, 25).total_page, 3);
        assert_eq!(Pagination::new(&page(1, 10), 10, 30).total_page, 3);
        assert_eq!(Pagination::new(&page(1, -1), 7, 7).total_page, 1);
        assert_eq!(Pagination::new(&page(1, -1), 0, 0).total_page, 0);
        assert_eq!(Pagination::new(&page(1, 0), 0, 12).total_page, 0);
    }

    #[test]
    fn total_page_handles_huge_page_size() {
        assert_eq!(Pagination::new(&page(1, i64::MAX), 2, 2).total_page, 1);
        assert_eq!(Pagination::new(&page(1, i64::MAX), 0, i64::MAX).total_page, 1);
        assert_eq!(Pagination::new(&page(1, 2), 2, i64::MAX).total_page, i64::MAX / 2 + 1);
    }

    #[test]
    fn pagination_data_serializes_flat() {
        let data = PaginationData::new(&page(2, 2), vec!["c", "d"], 5);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "page": 2,
                "page_size": 2,
                "total_page": 3,
                "total_data_per_page": 2,
                "total_data": 5,
                "data": ["c", "d"],
            })
        );
    }
}
