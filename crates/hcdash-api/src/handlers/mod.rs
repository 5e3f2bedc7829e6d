//! API request handlers

pub mod admin;
pub mod auth;
pub mod charts;
pub mod companies;
pub mod dashboard;
pub mod data_center;
pub mod filters;
pub mod input;
pub mod metric;
pub mod system;
pub mod upload;

use crate::error::ApiError;

/// Unknown API route
pub async fn api_not_found() -> ApiError {
    ApiError::NotFound("No such API route".to_string())
}

/// Unknown page when no front-end bundle is configured
pub async fn page_not_found() -> ApiError {
    ApiError::NotFound("Page not found".to_string())
}
