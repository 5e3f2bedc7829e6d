//! Form input routes

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use hcdash_db::{
    entities::{age_group, education, employee_status, headcount},
    repository::{self, KpiEntry, WorkforceRecords},
    MetricTable, PeriodKey,
};
use hcdash_metrics::{coerce_field, coerce_record, FieldSpec, FieldValue, InvalidField};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

use super::metric::{parse_month, parse_quarter, parse_year, with_metric_table, write_record};
use crate::error::{ApiError, ApiResult};
use crate::middleware::Scope;
use crate::models::*;
use crate::AppState;

/// Upsert one metric record
#[utoipa::path(
    post,
    path = "/api/input/{metric}",
    params(
        ("metric" = String, Path, description = "Metric name, e.g. turnover or org-health-score")
    ),
    request_body = MetricPayload,
    responses(
        (status = 200, description = "Saved record", body = serde_json::Value),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 403, description = "Another company's data", body = ErrorResponse),
        (status = 404, description = "Unknown metric", body = ErrorResponse)
    ),
    tag = "input"
)]
pub async fn submit_metric(
    State(state): State<Arc<AppState>>,
    scope: Scope,
    Path(metric): Path<String>,
    payload: Result<Json<MetricPayload>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(payload) = payload?;

    let saved = with_metric_table!(&metric, |Table| {
        write_record::<Table>(&state.db, &scope, &payload.fields).await
    })?;

    Ok(Json(saved))
}

fn float_field(raw: &Value, name: &'static str) -> Result<f64, InvalidField> {
    match coerce_field(Some(raw), &FieldSpec::float(name)) {
        FieldValue::Valid(n) => Ok(n.as_f64()),
        FieldValue::Invalid(e) => Err(e),
    }
}

fn kpi_entry(input: KpiInput, company_id: i32) -> Result<KpiEntry, Vec<InvalidField>> {
    let mut raw = Map::new();
    raw.insert("year".to_string(), input.year);
    raw.insert("quarter".to_string(), input.quarter);

    let name = input.name.trim().to_string();
    let results = (
        parse_year(&raw),
        parse_quarter(&raw),
        if name.is_empty() {
            Err(InvalidField::new("name", "must not be empty"))
        } else {
            Ok(name)
        },
        float_field(&input.weight, "weight").and_then(|w| {
            if (0.0..=1.0).contains(&w) {
                Ok(w)
            } else {
                Err(InvalidField::new("weight", "must be between 0 and 1"))
            }
        }),
        float_field(&input.achievement_score, "achievementScore"),
    );

    match results {
        (Ok(year), Ok(quarter), Ok(name), Ok(weight), Ok(achievement_score)) => Ok(KpiEntry {
            year,
            quarter,
            company_id,
            name,
            weight,
            achievement_score,
        }),
        (year, quarter, name, weight, achievement) => Err([
            year.err(),
            quarter.err(),
            name.err(),
            weight.err(),
            achievement.err(),
        ]
        .into_iter()
        .flatten()
        .collect()),
    }
}

/// Upsert one KPI line item of a quarter
#[utoipa::path(
    post,
    path = "/api/input/kpi",
    request_body = KpiInput,
    responses(
        (status = 200, description = "Saved KPI", body = Kpi),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 403, description = "Another company's data", body = ErrorResponse)
    ),
    tag = "input"
)]
pub async fn submit_kpi(
    State(state): State<Arc<AppState>>,
    scope: Scope,
    payload: Result<Json<KpiInput>, JsonRejection>,
) -> ApiResult<Json<Kpi>> {
    let Json(input) = payload?;
    let company_id = scope.write_company(input.company_id)?;

    let entry = kpi_entry(input, company_id).map_err(ApiError::InvalidFields)?;
    let saved = repository::upsert_kpi(&state.db, &entry).await?;

    info!(
        "User {} saved KPI '{}' for {} Q{} (company {})",
        scope.user.user_id, saved.name, saved.year, saved.quarter, saved.company_id
    );

    Ok(Json(saved.into()))
}

fn workforce_records(input: &WorkforceInput) -> Result<WorkforceRecords, Vec<InvalidField>> {
    // Nested field errors are reported as `section.field`
    fn section<E: MetricTable>(
        prefix: &str,
        raw: &Map<String, Value>,
        errors: &mut Vec<InvalidField>,
    ) -> hcdash_metrics::CoercedRecord {
        coerce_record(raw, E::FIELDS).unwrap_or_else(|invalid| {
            errors.extend(
                invalid
                    .into_iter()
                    .map(|e| InvalidField::new(format!("{}.{}", prefix, e.field), e.reason)),
            );
            Default::default()
        })
    }

    let mut errors = Vec::new();
    let records = WorkforceRecords {
        headcount: section::<headcount::Entity>("headcount", &input.headcount, &mut errors),
        employee_status: section::<employee_status::Entity>(
            "employeeStatus",
            &input.employee_status,
            &mut errors,
        ),
        education: section::<education::Entity>("education", &input.education, &mut errors),
        age_group: section::<age_group::Entity>("ageGroup", &input.age_group, &mut errors),
    };

    if errors.is_empty() {
        Ok(records)
    } else {
        Err(errors)
    }
}

/// Store headcount, employee status, education and age groups of one month
/// together. Either all four are written or none.
#[utoipa::path(
    post,
    path = "/api/input/workforce",
    request_body = WorkforceInput,
    responses(
        (status = 200, description = "All four records saved", body = serde_json::Value),
        (status = 400, description = "Invalid fields", body = ErrorResponse),
        (status = 403, description = "Another company's data", body = ErrorResponse)
    ),
    tag = "input"
)]
pub async fn submit_workforce(
    State(state): State<Arc<AppState>>,
    scope: Scope,
    payload: Result<Json<WorkforceInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(input) = payload?;
    let company_id = scope.write_company(input.company_id)?;

    let mut raw = Map::new();
    raw.insert("year".to_string(), input.year.clone());
    raw.insert("month".to_string(), input.month.clone());

    let mut errors = Vec::new();
    let year = parse_year(&raw).map_err(|e| errors.push(e)).ok();
    let month = parse_month(&raw).map_err(|e| errors.push(e)).ok();
    let records = workforce_records(&input)
        .map_err(|e| errors.extend(e))
        .ok();

    let (Some(year), Some(month), Some(records)) = (year, month, records) else {
        return Err(ApiError::InvalidFields(errors));
    };

    let key = PeriodKey::monthly(year, month, company_id);
    let rows = repository::ingest_workforce(&state.db, &key, &records).await?;

    info!(
        "User {} ingested workforce data for {:?}",
        scope.user.user_id, key
    );

    serde_json::to_value(rows)
        .map(Json)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize records: {}", e)))
}
