//! Dashboard API implementations

pub mod http;

pub use http::HttpDashboardApi;
