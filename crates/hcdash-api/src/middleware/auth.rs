//! Session authentication middleware
//!
//! Extracts the session JWT from the `session_token` cookie or an
//! `Authorization: Bearer` header, validates it and makes the caller
//! available to handlers as an `AuthUser` request extension.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use hcdash_auth::{JwtClaims, JwtError, JwtValidator, SESSION_ISSUER};
use hcdash_db::entities::user::UserRole;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session_token";

/// Authenticated caller, taken from the session token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: UserRole,
    pub company_id: i32,
}

impl AuthUser {
    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    fn from_claims(claims: JwtClaims) -> Result<Self, ApiError> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Token subject is not a user id".to_string()))?;

        let company_id = claims
            .company_id
            .ok_or_else(|| ApiError::Unauthorized("Token missing 'company_id' claim".to_string()))?;

        let role = claims
            .role
            .as_deref()
            .map(UserRole::from_claim)
            .unwrap_or(UserRole::User);

        Ok(Self {
            user_id,
            email: claims.email,
            role,
            company_id,
        })
    }
}

/// JWT validation state shared across middleware instances
#[derive(Clone)]
pub struct JwtState {
    pub validator: Arc<JwtValidator>,
}

impl JwtState {
    /// Create new JWT state with the given secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            validator: Arc::new(JwtValidator::new(secret).with_issuer(SESSION_ISSUER.to_string())),
        }
    }

    /// Validate whatever token the request carries and resolve the caller
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
        let token = session_token(headers)?;

        let claims = self.validator.validate(&token).map_err(|e| match e {
            JwtError::TokenExpired => ApiError::Unauthorized("Session expired".to_string()),
            _ => ApiError::Unauthorized(format!("Invalid or expired token: {}", e)),
        })?;

        AuthUser::from_claims(claims)
    }
}

/// Read the token from the session cookie, falling back to a Bearer header
pub fn session_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .map(str::trim)
        .find_map(|cookie| {
            cookie
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|token| !token.is_empty());

    if let Some(token) = from_cookie {
        return Ok(token.to_string());
    }

    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Missing authentication token (cookie or Authorization header)".to_string(),
            )
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Invalid Authorization header format. Expected 'Bearer <token>'".to_string(),
            )
        })
}

/// Reject API requests without a valid session with 401
pub async fn require_auth(
    State(state): State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = state.authenticate(request.headers()).inspect_err(|e| {
        warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
    })?;

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Reject callers that are not super-admins with 403. Runs after `require_auth`.
pub async fn require_super_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

    if !user.is_super_admin() {
        warn!(
            "User {} tried to reach {} without SUPER_ADMIN",
            user.user_id,
            request.uri().path()
        );
        return Err(ApiError::Forbidden(
            "This action requires the SUPER_ADMIN role".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

/// Sign a session token for `user`
pub fn issue_session(
    secret: &[u8],
    user_id: Uuid,
    email: &str,
    role: UserRole,
    company_id: i32,
    validity: chrono::Duration,
) -> Result<String, ApiError> {
    let claims = JwtClaims::new(user_id.to_string(), SESSION_ISSUER.to_string(), validity)
        .with_email(email.to_string())
        .with_role(role.as_str().to_string())
        .with_company_id(company_id);

    JwtValidator::encode(secret, &claims)
        .map_err(|e| ApiError::Internal(format!("Failed to sign session token: {}", e)))
}

/// `Set-Cookie` value installing a session
pub fn session_cookie(token: &str, max_age: chrono::Duration, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        max_age.num_seconds().max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value removing the session
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", chrono::Duration::zero(), secure)
}
