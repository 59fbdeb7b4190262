pub mod client;
pub mod pagination;
pub mod request;
pub mod shape;

pub use client::{ApiResponse, GitlabClient};
pub use pagination::Pagination;
pub use request::{encode_path_segment, ApiRequest};
