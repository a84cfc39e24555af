//! HTTP endpoint layer for the gasmon service

pub mod fetch;
pub mod routes;

pub use fetch::FeedSource;
pub use routes::{create_router, start_server, AppState, MaxValueResponse, FETCH_ERROR_BODY};
