use axum::{extract::State, Json};
use hcdash_db::repository;
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiResult;
use crate::middleware::Scope;
use crate::models::*;
use crate::AppState;

/// Companies visible to the caller, for the company filter
#[utoipa::path(
    get,
    path = "/api/companies",
    params(
        ("companyId" = Option<i32>, Query, description = "Narrow to one company (super-admin only)")
    ),
    responses(
        (status = 200, description = "Visible companies", body = Vec<CompanySummary>),
        (status = 401, description = "Not logged in", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn list_companies(
    State(state): State<Arc<AppState>>,
    scope: Scope,
) -> ApiResult<Json<Vec<CompanySummary>>> {
    debug!("Listing companies for {:?}", scope.scope);

    let companies = repository::list_companies(&state.db, scope.scope)
        .await?
        .into_iter()
        .map(|c| CompanySummary {
            id: c.id,
            name: c.name,
        })
        .collect();

    Ok(Json(companies))
}
