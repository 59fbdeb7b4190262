use crate::constants::pagination::{
    HEADER_NEXT_PAGE, HEADER_PAGE, HEADER_PER_PAGE, HEADER_TOTAL, HEADER_TOTAL_PAGES,
};
use reqwest::header::HeaderMap;
use serde::Serialize;

/// Paging state reported by the API for one page of results. A field is
/// present only when its header carried a positive integer; GitLab drops
/// `x-total` and `x-total-pages` on large collections and leaves
/// `x-next-page` empty on the last page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<u64>,
}

impl Pagination {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            current_page: read_positive(headers, HEADER_PAGE),
            per_page: read_positive(headers, HEADER_PER_PAGE),
            total_pages: read_positive(headers, HEADER_TOTAL_PAGES),
            total_items: read_positive(headers, HEADER_TOTAL),
            next_page: read_positive(headers, HEADER_NEXT_PAGE),
        }
    }
}

fn read_positive(headers: &HeaderMap, name: &str) -> Option<u64> {
    let value = headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(0);
    (value > 0).then_some(value)
}
