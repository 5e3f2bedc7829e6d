//! API Middleware
//!
//! Session authentication, role checks, company scoping and the page guard.

pub mod auth;
pub mod page;
pub mod scope;

pub use auth::{require_auth, require_super_admin, AuthUser, JwtState};
pub use page::require_page_session;
pub use scope::Scope;
