//! Company scope of a request
//!
//! Super-admins may look at any company, or all of them when no `companyId`
//! is given. Everyone else only ever sees their own company, whatever they
//! ask for.

use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};
use hcdash_db::CompanyScope;
use serde::Deserialize;
use tracing::debug;

use super::auth::AuthUser;
use crate::error::ApiError;

/// Scope the caller may read, given the company they asked for
pub fn resolve_scope(user: &AuthUser, requested: Option<i32>) -> CompanyScope {
    if user.is_super_admin() {
        requested.map_or(CompanyScope::All, CompanyScope::Company)
    } else {
        CompanyScope::Company(user.company_id)
    }
}

/// Company a write lands in.
///
/// Super-admins must name one. Other users may omit it or name their own
/// company; naming another company is refused.
pub fn resolve_write_company(user: &AuthUser, requested: Option<i32>) -> Result<i32, ApiError> {
    match requested {
        Some(id) if user.is_super_admin() || id == user.company_id => Ok(id),
        Some(_) => Err(ApiError::Forbidden(
            "You can only write data for your own company".to_string(),
        )),
        None if user.is_super_admin() => {
            Err(ApiError::Validation("companyId is required".to_string()))
        }
        None => Ok(user.company_id),
    }
}

#[derive(Debug, Deserialize)]
struct CompanyQuery {
    #[serde(rename = "companyId")]
    company_id: Option<String>,
}

/// `companyId` from the query string. Empty and `all` mean no company.
fn requested_company(uri: &Uri) -> Result<Option<i32>, ApiError> {
    let Query(query) = Query::<CompanyQuery>::try_from_uri(uri)?;

    let Some(value) = query.company_id else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }

    value
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::Validation("companyId must be an integer".to_string()))
}

/// Extractor resolving the caller and their company scope.
///
/// Requires `require_auth` to have run on the route.
#[derive(Debug, Clone)]
pub struct Scope {
    pub user: AuthUser,
    /// `companyId` from the query string, as asked
    pub requested: Option<i32>,
    pub scope: CompanyScope,
}

impl Scope {
    /// One company to read from. Super-admins must name it.
    pub fn single_company(&self) -> Result<i32, ApiError> {
        self.scope
            .company_id()
            .ok_or_else(|| ApiError::Validation("companyId is required".to_string()))
    }

    /// Company to write into, preferring an id carried in the body
    pub fn write_company(&self, from_body: Option<i32>) -> Result<i32, ApiError> {
        resolve_write_company(&self.user, from_body.or(self.requested))
    }
}

impl<S> FromRequestParts<S> for Scope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let requested = requested_company(&parts.uri)?;
        let scope = resolve_scope(&user, requested);

        debug!(
            "Scope for {} ({}): {:?}",
            user.user_id,
            user.role.as_str(),
            scope
        );

        Ok(Self {
            user,
            requested,
            scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcdash_db::entities::user::UserRole;
    use uuid::Uuid;

    fn user(role: UserRole, company_id: i32) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: None,
            role,
            company_id,
        }
    }

    #[test]
    fn test_regular_user_is_pinned_to_own_company() {
        let caller = user(UserRole::User, 3);

        assert_eq!(resolve_scope(&caller, Some(999)), CompanyScope::Company(3));
        assert_eq!(resolve_scope(&caller, None), CompanyScope::Company(3));
    }

    #[test]
    fn test_super_admin_gets_what_they_ask_for() {
        let caller = user(UserRole::SuperAdmin, 1);

        assert_eq!(resolve_scope(&caller, Some(999)), CompanyScope::Company(999));
        assert_eq!(resolve_scope(&caller, None), CompanyScope::All);
    }

    #[test]
    fn test_write_company() {
        let regular = user(UserRole::User, 3);
        let admin = user(UserRole::SuperAdmin, 1);

        assert_eq!(resolve_write_company(&regular, None).unwrap(), 3);
        assert_eq!(resolve_write_company(&regular, Some(3)).unwrap(), 3);
        assert!(matches!(
            resolve_write_company(&regular, Some(4)),
            Err(ApiError::Forbidden(_))
        ));

        assert_eq!(resolve_write_company(&admin, Some(4)).unwrap(), 4);
        assert!(matches!(
            resolve_write_company(&admin, None),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_requested_company_parsing() {
        let parse = |uri: &str| requested_company(&uri.parse::<Uri>().unwrap());

        assert_eq!(parse("/api/companies").unwrap(), None);
        assert_eq!(parse("/api/charts/headcount?year=2024").unwrap(), None);
        assert_eq!(
            parse("/api/charts/headcount?year=2024&companyId=12").unwrap(),
            Some(12)
        );
        assert_eq!(parse("/api/companies?companyId=%31%32").unwrap(), Some(12));
        assert_eq!(parse("/api/companies?companyId=all").unwrap(), None);
        assert_eq!(parse("/api/companies?companyId=").unwrap(), None);
        assert!(matches!(
            parse("/api/companies?companyId=abc"),
            Err(ApiError::Validation(_))
        ));
    }
}
