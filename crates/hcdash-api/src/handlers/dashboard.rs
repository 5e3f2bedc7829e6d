use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use hcdash_db::{
    entities::{employee_cost, employee_status, engagement, hcma_score, headcount, productivity, turnover},
    repository,
};
use hcdash_metrics::{ratio, sum_columns, ScoreScale};
use std::sync::Arc;
use tracing::debug;

use super::charts::engagement_score;
use crate::error::{ApiError, ApiResult};
use crate::middleware::Scope;
use crate::models::*;
use crate::AppState;

/// Summary cards of one month across the companies in scope
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    params(
        ("year" = i32, Query, description = "Year"),
        ("month" = i32, Query, description = "Month (1-12)"),
        ("companyId" = Option<i32>, Query, description = "Company (super-admin only)")
    ),
    responses(
        (status = 200, description = "Summary cards", body = DashboardSummary),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse)
    ),
    tag = "dashboard"
)]
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
    scope: Scope,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<Json<DashboardSummary>> {
    let Query(query) = query?;
    let (Some(year), Some(month)) = (query.year, query.month) else {
        return Err(ApiError::Validation("year and month are required".to_string()));
    };
    if !(1..=12).contains(&month) {
        return Err(ApiError::Validation(
            "month must be between 1 and 12".to_string(),
        ));
    }

    let db = &state.db;
    let scope = scope.scope;
    let months = [month as u32];

    debug!("Dashboard summary {}-{:02} ({:?})", year, month, scope);

    let headcount =
        repository::find_metric_rows::<headcount::Entity, _>(db, scope, year, &months).await?;
    let status =
        repository::find_metric_rows::<employee_status::Entity, _>(db, scope, year, &months)
            .await?;
    let turnover =
        repository::find_metric_rows::<turnover::Entity, _>(db, scope, year, &months).await?;
    let cost =
        repository::find_metric_rows::<employee_cost::Entity, _>(db, scope, year, &months).await?;
    let productivity =
        repository::find_metric_rows::<productivity::Entity, _>(db, scope, year, &months).await?;
    let engagement =
        repository::find_metric_rows::<engagement::Entity, _>(db, scope, year, &months).await?;
    let hcma = repository::find_metric_rows::<hcma_score::Entity, _>(db, scope, year, &[]).await?;

    let gender = sum_columns(&headcount, &months, &["male", "female"]);
    let contracts = sum_columns(&status, &months, &["permanent", "contract"]);
    let moves = sum_columns(
        &turnover,
        &months,
        &["resignations", "terminations", "headcountStart", "headcountEnd"],
    );
    let costs = sum_columns(&cost, &months, &["employeeCost", "revenue"]);
    let output = sum_columns(&productivity, &months, &["revenue", "netProfit", "employees"]);

    let get = |map: &std::collections::BTreeMap<String, f64>, key: &str| {
        map.get(key).copied().unwrap_or(0.0)
    };

    let male = get(&gender, "male") as i64;
    let female = get(&gender, "female") as i64;
    let employees = get(&output, "employees");

    let hcma_score = (!hcma.is_empty())
        .then(|| hcma.iter().map(|r| r.score).sum::<f64>() / hcma.len() as f64);

    Ok(Json(DashboardSummary {
        year,
        month,
        total_headcount: male + female,
        male,
        female,
        permanent: get(&contracts, "permanent") as i64,
        contract: get(&contracts, "contract") as i64,
        turnover_rate: ratio::turnover_rate(
            get(&moves, "resignations") + get(&moves, "terminations"),
            get(&moves, "headcountStart"),
            get(&moves, "headcountEnd"),
        ),
        employee_cost_ratio: ratio::employee_cost_ratio(
            get(&costs, "employeeCost"),
            get(&costs, "revenue"),
        ),
        revenue_per_employee: ratio::per_employee(get(&output, "revenue"), employees),
        net_profit_per_employee: ratio::per_employee(get(&output, "netProfit"), employees),
        engagement: engagement_score(&engagement, month as u32)
            .map(|s| ScoreCard::new(s, ScoreScale::Percent)),
        hcma: hcma_score.map(|s| ScoreCard::new(s, ScoreScale::Maturity)),
        has_data: !(headcount.is_empty()
            && status.is_empty()
            && turnover.is_empty()
            && cost.is_empty()
            && productivity.is_empty()
            && engagement.is_empty()),
    }))
}
