pub mod args;
pub mod issues;
pub mod projects;
pub mod search;
pub mod todos;
pub mod wiki;

use crate::gitlab::{ApiResponse, Pagination};
use serde_json::Value;

/// Wraps one page of a listing endpoint with the paging state GitLab
/// reported for it. `items` is already shaped (or deliberately raw).
pub(crate) fn listing(items: Value, response: &ApiResponse) -> Value {
    serde_json::json!({
        "items": items,
        "pagination": Pagination::from_headers(&response.headers),
    })
}
