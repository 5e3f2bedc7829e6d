use axum::{extract::State, Json};
use hcdash_db::repository;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::middleware::Scope;
use crate::models::*;
use crate::AppState;

/// Year/month pairs with headcount, turnover, productivity and employee cost
/// data, oldest first
#[utoipa::path(
    get,
    path = "/api/filters/available-periods",
    params(
        ("companyId" = Option<i32>, Query, description = "Company (super-admin only)")
    ),
    responses(
        (status = 200, description = "Periods with data", body = AvailablePeriods)
    ),
    tag = "filters"
)]
pub async fn available_periods(
    State(state): State<Arc<AppState>>,
    scope: Scope,
) -> ApiResult<Json<AvailablePeriods>> {
    let periods = repository::available_periods(&state.db, scope.scope)
        .await?
        .into_iter()
        .map(|(year, month)| AvailablePeriod { year, month })
        .collect();

    Ok(Json(AvailablePeriods { periods }))
}
