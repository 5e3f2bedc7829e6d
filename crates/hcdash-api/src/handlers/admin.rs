//! Company management, super-admin only

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use hcdash_db::{repository, CompanyScope};
use std::sync::Arc;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::*;
use crate::AppState;

fn company_name(req: &CompanyRequest) -> ApiResult<&str> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation(
            "Company name must not be empty".to_string(),
        ));
    }
    Ok(name)
}

/// All companies
#[utoipa::path(
    get,
    path = "/api/admin/companies",
    responses(
        (status = 200, description = "All companies", body = Vec<Company>),
        (status = 403, description = "Not a super-admin", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn list_companies(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Company>>> {
    let companies = repository::list_companies(&state.db, CompanyScope::All)
        .await?
        .into_iter()
        .map(Company::from)
        .collect();

    Ok(Json(companies))
}

/// Create a company
#[utoipa::path(
    post,
    path = "/api/admin/companies",
    request_body = CompanyRequest,
    responses(
        (status = 201, description = "Company created", body = Company),
        (status = 400, description = "Empty name or non-integer id", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn create_company(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CompanyRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Company>)> {
    let Json(req) = payload?;
    let name = company_name(&req)?;

    let company = repository::create_company(&state.db, name, req.company_type.into()).await?;

    info!("User {} created company {} ({})", user.user_id, company.id, company.name);

    Ok((StatusCode::CREATED, Json(company.into())))
}

/// Rename a company or change its type
#[utoipa::path(
    put,
    path = "/api/admin/companies/{id}",
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    request_body = CompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = Company),
        (status = 400, description = "Empty name or non-integer id", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse),
        (status = 409, description = "Name already taken", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn update_company(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<CompanyRequest>, JsonRejection>,
) -> ApiResult<Json<Company>> {
    let Path(id) = id?;
    let Json(req) = payload?;
    let name = company_name(&req)?;

    let company =
        repository::update_company(&state.db, id, name, req.company_type.into()).await?;

    info!("User {} updated company {}", user.user_id, company.id);

    Ok(Json(company.into()))
}

/// Delete a company and all of its metric data.
///
/// Refused while user accounts still belong to the company.
#[utoipa::path(
    delete,
    path = "/api/admin/companies/{id}",
    params(
        ("id" = i32, Path, description = "Company ID")
    ),
    responses(
        (status = 200, description = "Company deleted", body = MessageResponse),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "Company not found", body = ErrorResponse),
        (status = 409, description = "Users still belong to the company", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn delete_company(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    repository::delete_company(&state.db, id).await?;

    info!("User {} deleted company {}", user.user_id, id);

    Ok(Json(MessageResponse {
        message: format!("Company {} deleted", id),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_name_is_trimmed() {
        let req = CompanyRequest {
            name: "  PT Alpha ".to_string(),
            company_type: CompanyType::Anper,
        };
        assert_eq!(company_name(&req).unwrap(), "PT Alpha");

        let blank = CompanyRequest {
            name: " ".to_string(),
            company_type: CompanyType::Holding,
        };
        assert!(matches!(company_name(&blank), Err(ApiError::Validation(_))));
    }
}
