use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    Extension, Json,
};
use hcdash_auth::{check_strength, hash_password, verify_password};
use hcdash_db::{
    entities::user::{self, UserRole},
    repository::{self, NewUser},
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::{clear_session_cookie, issue_session, session_cookie, AuthUser};
use crate::models::*;
use crate::AppState;

type SessionResponse = (StatusCode, [(header::HeaderName, String); 1], Json<AuthResponse>);

/// Minimal shape check: one `@`, a non-empty local part and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|part| !part.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn start_session(state: &AppState, user: user::Model, status: StatusCode) -> ApiResult<SessionResponse> {
    let token = issue_session(
        state.jwt_secret.as_bytes(),
        user.id,
        &user.email,
        user.role,
        user.company_id,
        state.session_ttl,
    )?;

    let cookie = session_cookie(&token, state.session_ttl, state.secure_cookies);

    Ok((
        status,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse { user: user.into() }),
    ))
}

/// Create an account and start a session
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = AuthResponse),
        (status = 400, description = "Invalid email, weak password or unknown company", body = ErrorResponse),
        (status = 403, description = "Signup is disabled", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    if !state.allow_signup {
        return Err(ApiError::Forbidden(
            "Public registration is disabled".to_string(),
        ));
    }

    let Json(req) = payload?;
    let email = req.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }

    check_strength(&req.password).map_err(|e| ApiError::Validation(e.to_string()))?;

    if repository::find_company(&state.db, req.company_id)
        .await?
        .is_none()
    {
        return Err(ApiError::Validation(format!(
            "Unknown company {}",
            req.company_id
        )));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))?;

    let user = repository::create_user(
        &state.db,
        NewUser {
            email,
            password_hash,
            full_name: req.full_name.filter(|n| !n.trim().is_empty()),
            role: UserRole::User,
            company_id: req.company_id,
        },
    )
    .await?;

    info!("New user signed up: {} (company {})", user.email, user.company_id);

    start_session(&state, user, StatusCode::CREATED)
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let Json(req) = payload?;
    let email = req.email.trim().to_lowercase();

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let Some(user) = repository::find_user_by_email(&state.db, &email).await? else {
        warn!("Login attempt for unknown email {}", email);
        return Err(invalid());
    };

    match verify_password(&req.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            warn!("Wrong password for {}", email);
            return Err(invalid());
        }
        Err(e) => {
            return Err(ApiError::Internal(format!(
                "Password check failed for {}: {}",
                email, e
            )));
        }
    }

    info!("User logged in: {}", user.email);

    start_session(&state, user, StatusCode::OK)
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
) -> ([(header::HeaderName, String); 1], Json<MessageResponse>) {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies))],
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// Current user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<User>> {
    let user = repository::find_user(&state.db, auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
