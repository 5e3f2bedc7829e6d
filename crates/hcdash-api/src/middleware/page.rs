//! Page guard for the front-end bundle
//!
//! Non-API page requests without a valid session are redirected to the
//! login page. API routes answer 401 themselves, so they pass through.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::auth::JwtState;

pub const LOGIN_PAGE: &str = "/login";

const PUBLIC_PAGES: &[&str] = &[LOGIN_PAGE, "/signup"];

/// Whether `path` may be served without a session
pub fn is_public_path(path: &str) -> bool {
    if path == "/api" || path.starts_with("/api/") || path.starts_with("/swagger-ui") {
        return true;
    }

    if PUBLIC_PAGES
        .iter()
        .any(|page| path == *page || path.starts_with(&format!("{}/", page)))
    {
        return true;
    }

    // Static assets (scripts, styles, images) carry a file extension
    path.rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}

pub async fn require_page_session(
    State(state): State<Arc<JwtState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_public_path(&path) || state.authenticate(request.headers()).is_ok() {
        return next.run(request).await;
    }

    debug!("Redirecting unauthenticated page request {} to login", path);
    Redirect::to(LOGIN_PAGE).into_response()
}
