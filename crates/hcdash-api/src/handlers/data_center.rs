//! Data center: read and edit the stored record of one period

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use hcdash_db::{Grain, MetricTable, PeriodKey};
use serde_json::Value;
use std::sync::Arc;

use super::metric::{read_record, with_metric_table, write_record, MAX_YEAR, MIN_YEAR};
use crate::error::{ApiError, ApiResult};
use crate::middleware::Scope;
use crate::models::*;
use crate::AppState;

fn read_key(grain: Grain, query: &PeriodQuery, company_id: i32) -> ApiResult<PeriodKey> {
    let year = query
        .year
        .ok_or_else(|| ApiError::Validation("year is required".to_string()))?;
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ApiError::Validation(format!(
            "year must be between {} and {}",
            MIN_YEAR, MAX_YEAR
        )));
    }

    match grain {
        Grain::Yearly => Ok(PeriodKey::yearly(year, company_id)),
        Grain::Monthly => {
            let month = query
                .month
                .ok_or_else(|| ApiError::Validation("month is required".to_string()))?;
            if !(1..=12).contains(&month) {
                return Err(ApiError::Validation(
                    "month must be between 1 and 12".to_string(),
                ));
            }
            Ok(PeriodKey::monthly(year, month, company_id))
        }
    }
}

/// Stored record for one period, or `null`
#[utoipa::path(
    get,
    path = "/api/data-center/{metric}",
    params(
        ("metric" = String, Path, description = "Metric name, e.g. headcount or hcma-score"),
        ("year" = i32, Query, description = "Year"),
        ("month" = Option<i32>, Query, description = "Month (monthly metrics)"),
        ("companyId" = Option<i32>, Query, description = "Company (required for super-admins)")
    ),
    responses(
        (status = 200, description = "Stored record or null", body = serde_json::Value),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
        (status = 404, description = "Unknown metric", body = ErrorResponse)
    ),
    tag = "data-center"
)]
pub async fn get_record(
    State(state): State<Arc<AppState>>,
    scope: Scope,
    Path(metric): Path<String>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query?;
    let company_id = scope.single_company()?;

    let record = with_metric_table!(&metric, |Table| {
        let key = read_key(<Table as MetricTable>::GRAIN, &query, company_id)?;
        read_record::<Table>(&state.db, &key).await
    })?;

    Ok(Json(record))
}

/// Create or overwrite the record of one period
#[utoipa::path(
    post,
    path = "/api/data-center/{metric}",
    params(
        ("metric" = String, Path, description = "Metric name, e.g. headcount or hcma-score")
    ),
    request_body = MetricPayload,
    responses(
        (status = 200, description = "Saved", body = SavedMetric),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 403, description = "Another company's data", body = ErrorResponse),
        (status = 404, description = "Unknown metric", body = ErrorResponse)
    ),
    tag = "data-center"
)]
pub async fn save_record(
    State(state): State<Arc<AppState>>,
    scope: Scope,
    Path(metric): Path<String>,
    payload: Result<Json<MetricPayload>, JsonRejection>,
) -> ApiResult<Json<SavedMetric>> {
    let Json(payload) = payload?;

    let data = with_metric_table!(&metric, |Table| {
        write_record::<Table>(&state.db, &scope, &payload.fields).await
    })?;

    Ok(Json(SavedMetric {
        message: format!("{} data saved", metric),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_key_requires_month_for_monthly() {
        let query = PeriodQuery {
            year: Some(2024),
            month: None,
        };

        assert!(read_key(Grain::Monthly, &query, 1).is_err());
        assert_eq!(
            read_key(Grain::Yearly, &query, 1).unwrap(),
            PeriodKey::yearly(2024, 1)
        );
    }

    #[test]
    fn test_read_key_bounds() {
        let query = PeriodQuery {
            year: Some(2024),
            month: Some(13),
        };
        assert!(read_key(Grain::Monthly, &query, 1).is_err());

        let query = PeriodQuery {
            year: None,
            month: Some(1),
        };
        assert!(read_key(Grain::Monthly, &query, 1).is_err());
    }
}
