pub mod network {
    pub const TIMEOUT_API_REQUEST_MS: u64 = 30_000;
    pub const API_SUFFIX: &str = "/api/v4";
    pub const TOKEN_HEADER: &str = "private-token";
}

pub mod pagination {
    pub const PAGE_SIZE: u32 = 100;
    pub const FIRST_PAGE: u32 = 1;
    pub const HEADER_PAGE: &str = "x-page";
    pub const HEADER_PER_PAGE: &str = "x-per-page";
    pub const HEADER_TOTAL_PAGES: &str = "x-total-pages";
    pub const HEADER_TOTAL: &str = "x-total";
    pub const HEADER_NEXT_PAGE: &str = "x-next-page";
}

pub mod messages {
    pub const UNAUTHORIZED: &str = "Unauthorized: check access token";
    pub const FORBIDDEN: &str = "Forbidden: insufficient permission for this resource";
    pub const NOT_FOUND: &str = "Not found: the requested resource does not exist";
    pub const REMOTE_PREFIX: &str = "Remote API error";
    pub const UNEXPECTED_PREFIX: &str = "An unexpected error occurred";
}

pub mod protocols {
    pub const ALLOWED_HTTP: &[&str] = &["http", "https"];
}
