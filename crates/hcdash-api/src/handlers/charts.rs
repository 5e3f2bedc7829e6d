//! Chart-ready aggregates
//!
//! Monthly charts always answer 200 with a zero-filled body and
//! `hasData: false` when the period has no rows. The yearly scores and the
//! KPI chart answer 404 instead, since there is nothing meaningful to plot.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use hcdash_db::{
    entities::{
        age_group, culture_maturity_score, education, employee_cost, employee_status, engagement,
        formation_ratio, hcma_score, headcount, kpi, org_health_score, org_structure_score,
        productivity, turnover,
    },
    repository, CompanyScope, MetricTable,
};
use hcdash_metrics::{
    classify, kpi_quarter_percent, monthly_series, ratio, stock_rows, sum_columns, sum_stock,
    AgeBand, MetricRow, Period, PeriodType, ScoreScale, StockAt,
};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::middleware::Scope;
use crate::models::*;
use crate::AppState;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Period selector from `type`, `value` and `year`. `value` is optional for
/// yearly periods only.
pub fn period_from_query(query: &ChartQuery) -> ApiResult<Period> {
    let kind: PeriodType = query
        .period_type
        .as_deref()
        .ok_or_else(|| ApiError::Validation("type is required".to_string()))?
        .parse()?;

    let year = query
        .year
        .ok_or_else(|| ApiError::Validation("year is required".to_string()))?;

    let value = match kind {
        PeriodType::Yearly => query.value.unwrap_or(1),
        _ => query
            .value
            .ok_or_else(|| ApiError::Validation("value is required".to_string()))?,
    };

    Ok(Period::new(kind, value, year))
}

fn month_labels(months: &[u32]) -> Vec<String> {
    months
        .iter()
        .filter_map(|m| MONTH_LABELS.get((*m as usize).wrapping_sub(1)))
        .map(|label| label.to_string())
        .collect()
}

fn has_rows<R: MetricRow>(rows: &[R], months: &[u32]) -> bool {
    rows.iter().any(|r| months.contains(&r.month()))
}

fn total(map: &BTreeMap<String, f64>, key: &str) -> f64 {
    map.get(key).copied().unwrap_or(0.0)
}

fn series<R: MetricRow>(rows: &[R], months: &[u32], columns: &[&str]) -> Vec<Series> {
    columns
        .iter()
        .map(|column| Series {
            name: column.to_string(),
            values: monthly_series(rows, months, column),
        })
        .collect()
}

struct ChartContext {
    chart: &'static str,
    period: Period,
    months: Vec<u32>,
}

impl ChartContext {
    fn response(&self, labels: Vec<String>, series: Vec<Series>) -> ChartResponse {
        ChartResponse {
            chart: self.chart.to_string(),
            period: PeriodInfo {
                period_type: self.period.kind.to_string(),
                value: self.period.value,
                year: self.period.year,
                months: self.months.clone(),
            },
            labels,
            series,
            totals: BTreeMap::new(),
            derived: BTreeMap::new(),
            bands: BTreeMap::new(),
            has_data: false,
        }
    }
}

/// Headcount is a stock: the series shows every month, the totals each
/// company's latest month that has data.
fn headcount_chart(ctx: &ChartContext, rows: &[headcount::Model]) -> ChartResponse {
    let mut lines = series(rows, &ctx.months, &["male", "female"]);
    let total_line: Vec<f64> = lines[0]
        .values
        .iter()
        .zip(&lines[1].values)
        .map(|(m, f)| m + f)
        .collect();
    lines.push(Series {
        name: "total".to_string(),
        values: total_line,
    });

    let mut totals = sum_stock(rows, &ctx.months, &["male", "female"], StockAt::Latest);
    totals.insert("total".to_string(), total(&totals, "male") + total(&totals, "female"));

    ChartResponse {
        totals,
        has_data: has_rows(rows, &ctx.months),
        ..ctx.response(month_labels(&ctx.months), lines)
    }
}

/// Breakdown of each company's latest month with data into categories
fn composition_chart<R: MetricRow>(
    ctx: &ChartContext,
    rows: &[R],
    categories: &[(&str, &str)],
) -> ChartResponse {
    let keys: Vec<&str> = categories.iter().map(|(key, _)| *key).collect();
    let mut totals = sum_stock(rows, &ctx.months, &keys, StockAt::Latest);

    let values: Vec<f64> = keys.iter().map(|key| total(&totals, key)).collect();
    totals.insert("total".to_string(), values.iter().sum());

    let labels = categories
        .iter()
        .map(|(_, label)| label.to_string())
        .collect();

    ChartResponse {
        totals,
        has_data: has_rows(rows, &ctx.months),
        ..ctx.response(
            labels,
            vec![Series {
                name: "employees".to_string(),
                values,
            }],
        )
    }
}

fn turnover_chart(ctx: &ChartContext, rows: &[turnover::Model]) -> ChartResponse {
    let mut totals = sum_columns(rows, &ctx.months, &["resignations", "terminations"]);
    let leavers = total(&totals, "resignations") + total(&totals, "terminations");

    let start = total(
        &sum_stock(rows, &ctx.months, &["headcountStart"], StockAt::Earliest),
        "headcountStart",
    );
    let end = total(
        &sum_stock(rows, &ctx.months, &["headcountEnd"], StockAt::Latest),
        "headcountEnd",
    );
    totals.insert("headcountStart".to_string(), start);
    totals.insert("headcountEnd".to_string(), end);
    totals.insert("leavers".to_string(), leavers);

    let mut derived = BTreeMap::new();
    derived.insert(
        "turnoverRate".to_string(),
        ratio::turnover_rate(leavers, start, end),
    );

    ChartResponse {
        totals,
        derived,
        has_data: has_rows(rows, &ctx.months),
        ..ctx.response(
            month_labels(&ctx.months),
            series(rows, &ctx.months, &["resignations", "terminations"]),
        )
    }
}

fn productivity_chart(ctx: &ChartContext, rows: &[productivity::Model]) -> ChartResponse {
    let mut totals = sum_columns(rows, &ctx.months, &["revenue", "netProfit"]);
    let employees = total(
        &sum_stock(rows, &ctx.months, &["employees"], StockAt::Latest),
        "employees",
    );
    totals.insert("employees".to_string(), employees);

    let mut derived = BTreeMap::new();
    derived.insert(
        "revenuePerEmployee".to_string(),
        ratio::per_employee(total(&totals, "revenue"), employees),
    );
    derived.insert(
        "netProfitPerEmployee".to_string(),
        ratio::per_employee(total(&totals, "netProfit"), employees),
    );

    ChartResponse {
        totals,
        derived,
        has_data: has_rows(rows, &ctx.months),
        ..ctx.response(
            month_labels(&ctx.months),
            series(rows, &ctx.months, &["revenue", "netProfit"]),
        )
    }
}

fn employee_cost_chart(ctx: &ChartContext, rows: &[employee_cost::Model]) -> ChartResponse {
    let totals = sum_columns(rows, &ctx.months, &["employeeCost", "revenue"]);

    let mut derived = BTreeMap::new();
    derived.insert(
        "employeeCostRatio".to_string(),
        ratio::employee_cost_ratio(total(&totals, "employeeCost"), total(&totals, "revenue")),
    );

    ChartResponse {
        totals,
        derived,
        has_data: has_rows(rows, &ctx.months),
        ..ctx.response(
            month_labels(&ctx.months),
            series(rows, &ctx.months, &["employeeCost", "revenue"]),
        )
    }
}

/// Respondent-weighted engagement score of `month` across companies.
/// Falls back to the plain mean when nobody reported respondents.
pub fn engagement_score(rows: &[engagement::Model], month: u32) -> Option<f64> {
    let in_month: Vec<&engagement::Model> =
        rows.iter().filter(|r| r.month() == month).collect();
    weighted_engagement(&in_month)
}

fn weighted_engagement(rows: &[&engagement::Model]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }

    let respondents: f64 = rows.iter().map(|r| r.respondents.max(0) as f64).sum();
    if respondents > 0.0 {
        let weighted: f64 = rows
            .iter()
            .map(|r| r.score * r.respondents.max(0) as f64)
            .sum();
        Some(weighted / respondents)
    } else {
        Some(rows.iter().map(|r| r.score).sum::<f64>() / rows.len() as f64)
    }
}

fn engagement_chart(ctx: &ChartContext, rows: &[engagement::Model]) -> ChartResponse {
    let scores = Series {
        name: "score".to_string(),
        values: ctx
            .months
            .iter()
            .map(|m| engagement_score(rows, *m).unwrap_or(0.0))
            .collect(),
    };
    let respondents = Series {
        name: "respondents".to_string(),
        values: monthly_series(rows, &ctx.months, "respondents"),
    };

    let latest = stock_rows(rows, &ctx.months, StockAt::Latest);
    let mut totals = sum_stock(rows, &ctx.months, &["respondents"], StockAt::Latest);
    let mut bands = BTreeMap::new();

    let score = weighted_engagement(&latest);
    totals.insert("score".to_string(), score.unwrap_or(0.0));
    if let Some(score) = score {
        bands.insert(
            "score".to_string(),
            classify(score, ScoreScale::Percent).label().to_string(),
        );
    }

    ChartResponse {
        totals,
        bands,
        has_data: !latest.is_empty(),
        ..ctx.response(month_labels(&ctx.months), vec![scores, respondents])
    }
}

async fn period_rows<E: MetricTable>(
    db: &DatabaseConnection,
    scope: CompanyScope,
    ctx: &ChartContext,
) -> ApiResult<Vec<E::Model>> {
    if ctx.months.is_empty() {
        return Ok(Vec::new());
    }
    Ok(repository::find_metric_rows::<E, _>(db, scope, ctx.period.year, &ctx.months).await?)
}

/// Monthly chart for the selected period
#[utoipa::path(
    get,
    path = "/api/charts/{chart}",
    params(
        ("chart" = String, Path, description = "headcount, employee-status, education, age, turnover, productivity, employee-cost or engagement"),
        ("type" = String, Query, description = "monthly, quarterly, semesterly or yearly"),
        ("year" = i32, Query, description = "Year"),
        ("value" = Option<i32>, Query, description = "Month, quarter or semester number"),
        ("companyId" = Option<i32>, Query, description = "Company (super-admin only; all companies if omitted)")
    ),
    responses(
        (status = 200, description = "Chart data, zero-filled when the period is empty", body = ChartResponse),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
        (status = 404, description = "Unknown chart", body = ErrorResponse)
    ),
    tag = "charts"
)]
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    scope: Scope,
    Path(chart): Path<String>,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> ApiResult<Json<ChartResponse>> {
    let Query(query) = query?;
    let period = period_from_query(&query)?;
    let months = period.months();
    let db = &state.db;
    let scope = scope.scope;

    debug!("Chart {} for {:?} months {:?} ({:?})", chart, period, months, scope);

    let ctx = |chart: &'static str| ChartContext {
        chart,
        period,
        months: months.clone(),
    };

    let response = match chart.as_str() {
        "headcount" => {
            let ctx = ctx("headcount");
            let rows = period_rows::<headcount::Entity>(db, scope, &ctx).await?;
            headcount_chart(&ctx, &rows)
        }
        "employee-status" => {
            let ctx = ctx("employee-status");
            let rows = period_rows::<employee_status::Entity>(db, scope, &ctx).await?;
            composition_chart(
                &ctx,
                &rows,
                &[("permanent", "Permanent"), ("contract", "Contract")],
            )
        }
        "education" => {
            let ctx = ctx("education");
            let rows = period_rows::<education::Entity>(db, scope, &ctx).await?;
            composition_chart(
                &ctx,
                &rows,
                &[
                    ("highSchool", "High School"),
                    ("diploma", "Diploma"),
                    ("bachelor", "Bachelor"),
                    ("master", "Master"),
                    ("doctorate", "Doctorate"),
                ],
            )
        }
        "age" => {
            let ctx = ctx("age");
            let rows = period_rows::<age_group::Entity>(db, scope, &ctx).await?;
            let categories: Vec<(&str, &str)> =
                AgeBand::ALL.iter().map(|b| (b.key(), b.label())).collect();
            composition_chart(&ctx, &rows, &categories)
        }
        "turnover" => {
            let ctx = ctx("turnover");
            let rows = period_rows::<turnover::Entity>(db, scope, &ctx).await?;
            turnover_chart(&ctx, &rows)
        }
        "productivity" => {
            let ctx = ctx("productivity");
            let rows = period_rows::<productivity::Entity>(db, scope, &ctx).await?;
            productivity_chart(&ctx, &rows)
        }
        "employee-cost" => {
            let ctx = ctx("employee-cost");
            let rows = period_rows::<employee_cost::Entity>(db, scope, &ctx).await?;
            employee_cost_chart(&ctx, &rows)
        }
        "engagement" => {
            let ctx = ctx("engagement");
            let rows = period_rows::<engagement::Entity>(db, scope, &ctx).await?;
            engagement_chart(&ctx, &rows)
        }
        other => return Err(ApiError::NotFound(format!("Unknown chart '{}'", other))),
    };

    Ok(Json(response))
}

/// Quarter score with the over-achievement cap applied per KPI.
///
/// With several companies in scope the quarter score is the mean of the
/// per-company scores.
pub fn kpi_quarters(rows: Vec<kpi::Model>) -> Vec<KpiQuarter> {
    let mut by_quarter: BTreeMap<i32, Vec<kpi::Model>> = BTreeMap::new();
    for row in rows {
        by_quarter.entry(row.quarter).or_default().push(row);
    }

    by_quarter
        .into_iter()
        .map(|(quarter, items)| {
            let mut per_company: BTreeMap<i32, Vec<(f64, f64)>> = BTreeMap::new();
            for item in &items {
                per_company
                    .entry(item.company_id)
                    .or_default()
                    .push((item.weight, item.achievement_score));
            }

            let scores: Vec<f64> = per_company
                .into_values()
                .map(kpi_quarter_percent)
                .collect();
            let score = scores.iter().sum::<f64>() / scores.len().max(1) as f64;

            KpiQuarter {
                quarter,
                score,
                // Capped over-achievement can exceed 100 and still ranks as Excellence
                band: classify(score.min(100.0), ScoreScale::Percent)
                    .label()
                    .to_string(),
                items: items.into_iter().map(Kpi::from).collect(),
            }
        })
        .collect()
}

/// KPI scores per quarter of a year
#[utoipa::path(
    get,
    path = "/api/charts/kpi",
    params(
        ("year" = i32, Query, description = "Year"),
        ("type" = Option<String>, Query, description = "Pass quarterly with value to select one quarter"),
        ("value" = Option<i32>, Query, description = "Quarter (1-4) when type is quarterly"),
        ("companyId" = Option<i32>, Query, description = "Company (super-admin only)")
    ),
    responses(
        (status = 200, description = "Quarter scores", body = KpiChart),
        (status = 400, description = "Missing or invalid parameters", body = ErrorResponse),
        (status = 404, description = "No KPI rows for the selection", body = ErrorResponse)
    ),
    tag = "charts"
)]
pub async fn get_kpi_chart(
    State(state): State<Arc<AppState>>,
    scope: Scope,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> ApiResult<Json<KpiChart>> {
    let Query(query) = query?;
    let year = query
        .year
        .ok_or_else(|| ApiError::Validation("year is required".to_string()))?;

    let kind = query
        .period_type
        .as_deref()
        .map(str::parse::<PeriodType>)
        .transpose()?;
    let quarter = match kind {
        Some(PeriodType::Quarterly) => Some(
            query
                .value
                .ok_or_else(|| ApiError::Validation("value is required".to_string()))?,
        ),
        _ => None,
    };

    let rows = repository::find_kpis(&state.db, scope.scope, year, quarter).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound(format!("No KPI data for {}", year)));
    }

    Ok(Json(KpiChart {
        year,
        quarters: kpi_quarters(rows),
    }))
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Yearly scores; the mean across companies when several are in scope
pub async fn yearly_scores(
    db: &DatabaseConnection,
    scope: CompanyScope,
    year: i32,
) -> ApiResult<ScoresChart> {
    let hcma = repository::find_metric_rows::<hcma_score::Entity, _>(db, scope, year, &[]).await?;
    let structure =
        repository::find_metric_rows::<org_structure_score::Entity, _>(db, scope, year, &[])
            .await?;
    let health =
        repository::find_metric_rows::<org_health_score::Entity, _>(db, scope, year, &[]).await?;
    let culture =
        repository::find_metric_rows::<culture_maturity_score::Entity, _>(db, scope, year, &[])
            .await?;
    let formation =
        repository::find_metric_rows::<formation_ratio::Entity, _>(db, scope, year, &[]).await?;

    let card = |score: Option<f64>, scale| score.map(|s| ScoreCard::new(s, scale));

    let formation_ratio = (!formation.is_empty()).then(|| {
        let planned: i64 = formation.iter().map(|r| r.planned as i64).sum();
        let filled: i64 = formation.iter().map(|r| r.filled as i64).sum();
        FormationCard {
            planned,
            filled,
            ratio: ratio::formation_fill_ratio(planned as f64, filled as f64),
        }
    });

    Ok(ScoresChart {
        year,
        hcma: card(mean(hcma.iter().map(|r| r.score)), ScoreScale::Maturity),
        org_structure: card(mean(structure.iter().map(|r| r.score)), ScoreScale::Percent),
        org_health: card(mean(health.iter().map(|r| r.score)), ScoreScale::Percent),
        culture_maturity: card(mean(culture.iter().map(|r| r.score)), ScoreScale::Maturity),
        formation_ratio,
    })
}

/// HCMA, org structure, org health and culture maturity scores of a year,
/// with their bands, plus the formation ratio
#[utoipa::path(
    get,
    path = "/api/charts/scores",
    params(
        ("year" = i32, Query, description = "Year"),
        ("companyId" = Option<i32>, Query, description = "Company (super-admin only)")
    ),
    responses(
        (status = 200, description = "Yearly scores", body = ScoresChart),
        (status = 400, description = "Missing year", body = ErrorResponse),
        (status = 404, description = "No scores for the year", body = ErrorResponse)
    ),
    tag = "charts"
)]
pub async fn get_scores_chart(
    State(state): State<Arc<AppState>>,
    scope: Scope,
    query: Result<Query<ChartQuery>, QueryRejection>,
) -> ApiResult<Json<ScoresChart>> {
    let Query(query) = query?;
    let year = query
        .year
        .ok_or_else(|| ApiError::Validation("year is required".to_string()))?;

    let scores = yearly_scores(&state.db, scope.scope, year).await?;

    if scores.hcma.is_none()
        && scores.org_structure.is_none()
        && scores.org_health.is_none()
        && scores.culture_maturity.is_none()
        && scores.formation_ratio.is_none()
    {
        return Err(ApiError::NotFound(format!("No scores for {}", year)));
    }

    Ok(Json(scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ctx(kind: PeriodType, value: i32) -> ChartContext {
        let period = Period::new(kind, value, 2024);
        ChartContext {
            chart: "test",
            period,
            months: period.months(),
        }
    }

    fn hc(month: i32, company_id: i32, male: i32, female: i32) -> headcount::Model {
        headcount::Model {
            id: month * 100 + company_id,
            year: 2024,
            month,
            company_id,
            male,
            female,
            updated_at: Utc::now(),
        }
    }

    fn kpi_row(quarter: i32, company_id: i32, weight: f64, achievement: f64) -> kpi::Model {
        kpi::Model {
            id: 0,
            year: 2024,
            quarter,
            company_id,
            name: format!("kpi-{}-{}", quarter, weight),
            weight,
            achievement_score: achievement,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_period_from_query() {
        let query = ChartQuery {
            period_type: Some("Quarterly".to_string()),
            year: Some(2024),
            value: Some(2),
        };
        assert_eq!(period_from_query(&query).unwrap().months(), vec![4, 5, 6]);

        let yearly = ChartQuery {
            period_type: Some("yearly".to_string()),
            year: Some(2024),
            value: None,
        };
        assert_eq!(period_from_query(&yearly).unwrap().months().len(), 12);

        let missing_value = ChartQuery {
            value: None,
            ..query.clone()
        };
        assert!(period_from_query(&missing_value).is_err());

        let bad_type = ChartQuery {
            period_type: Some("weekly".to_string()),
            ..query
        };
        assert!(matches!(
            period_from_query(&bad_type),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_headcount_chart_uses_latest_month_for_totals() {
        let rows = vec![hc(4, 1, 10, 5), hc(5, 1, 12, 6), hc(5, 2, 3, 3)];
        let chart = headcount_chart(&ctx(PeriodType::Quarterly, 2), &rows);

        assert!(chart.has_data);
        assert_eq!(chart.labels, vec!["Apr", "May", "Jun"]);
        assert_eq!(chart.series[0].values, vec![10.0, 15.0, 0.0]);
        assert_eq!(chart.series[2].values, vec![15.0, 24.0, 0.0]);
        assert_eq!(chart.totals["male"], 15.0);
        assert_eq!(chart.totals["total"], 24.0);
    }

    #[test]
    fn test_stock_totals_keep_companies_reporting_different_months() {
        let rows = vec![hc(4, 1, 100, 50), hc(5, 2, 10, 5)];
        let chart = headcount_chart(&ctx(PeriodType::Quarterly, 2), &rows);

        assert_eq!(chart.totals["male"], 110.0);
        assert_eq!(chart.totals["female"], 55.0);
        assert_eq!(chart.totals["total"], 165.0);

        let turnover_row = |month, company_id, start, end| turnover::Model {
            id: month * 100 + company_id,
            year: 2024,
            month,
            company_id,
            headcount_start: start,
            headcount_end: end,
            resignations: 1,
            terminations: 0,
            updated_at: Utc::now(),
        };
        let rows = vec![
            turnover_row(4, 1, 100, 98),
            turnover_row(6, 1, 98, 97),
            turnover_row(5, 2, 20, 19),
        ];
        let chart = turnover_chart(&ctx(PeriodType::Quarterly, 2), &rows);

        assert_eq!(chart.totals["headcountStart"], 120.0);
        assert_eq!(chart.totals["headcountEnd"], 116.0);
        assert_eq!(chart.totals["leavers"], 3.0);
    }

    #[test]
    fn test_empty_period_is_zero_filled() {
        let chart = headcount_chart(&ctx(PeriodType::Quarterly, 5), &[]);

        assert!(!chart.has_data);
        assert!(chart.labels.is_empty());
        assert_eq!(chart.totals["total"], 0.0);

        let chart = composition_chart::<headcount::Model>(
            &ctx(PeriodType::Monthly, 3),
            &[],
            &[("male", "Male"), ("female", "Female")],
        );
        assert!(!chart.has_data);
        assert_eq!(chart.series[0].values, vec![0.0, 0.0]);
        assert_eq!(chart.labels, vec!["Male", "Female"]);
    }

    #[test]
    fn test_engagement_score_is_respondent_weighted() {
        let row = |company_id, score, respondents| engagement::Model {
            id: company_id,
            year: 2024,
            month: 1,
            company_id,
            score,
            respondents,
            updated_at: Utc::now(),
        };

        let rows = vec![row(1, 80.0, 30), row(2, 60.0, 10)];
        assert_eq!(engagement_score(&rows, 1), Some(75.0));

        let chart = engagement_chart(&ctx(PeriodType::Quarterly, 1), &rows);
        assert_eq!(chart.totals["respondents"], 40.0);
        assert_eq!(chart.totals["score"], 75.0);
        assert_eq!(engagement_score(&rows, 2), None);

        let unweighted = vec![row(1, 80.0, 0), row(2, 60.0, 0)];
        assert_eq!(engagement_score(&unweighted, 1), Some(70.0));
    }

    #[test]
    fn test_kpi_quarters_cap_achievement() {
        let quarters = kpi_quarters(vec![
            kpi_row(2, 1, 0.5, 1.5),
            kpi_row(2, 1, 0.5, 1.0),
            kpi_row(1, 1, 1.0, 0.8),
        ]);

        assert_eq!(quarters.len(), 2);
        assert_eq!(quarters[0].quarter, 1);
        assert!((quarters[0].score - 80.0).abs() < 1e-9);
        assert_eq!(quarters[0].band, "Good");

        // 0.5 * 1.10 + 0.5 * 1.0
        assert!((quarters[1].score - 105.0).abs() < 1e-9);
        assert_eq!(quarters[1].band, "Excellence");
        assert!((quarters[1].items[0].contribution - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_kpi_quarters_average_companies() {
        let quarters = kpi_quarters(vec![kpi_row(3, 1, 1.0, 0.5), kpi_row(3, 2, 1.0, 0.9)]);

        assert_eq!(quarters.len(), 1);
        assert!((quarters[0].score - 70.0).abs() < 1e-9);
        assert_eq!(quarters[0].band, "Medium");
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(Vec::<f64>::new()), None);
        assert_eq!(mean(vec![2.0, 3.0]), Some(2.5));
    }
}
