//! Shared plumbing for the `{metric}` routes
//!
//! Maps a metric name from the URL onto its table and validates flat
//! payloads into a period key plus a coerced record.

use hcdash_db::{repository, Grain, MetricTable, PeriodKey};
use hcdash_metrics::{coerce_field, coerce_record, FieldSpec, FieldValue, InvalidField};
use sea_orm::{DatabaseConnection, IntoActiveModel};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::middleware::Scope;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Run `$body` with `$table` aliased to the entity whose `MetricTable::NAME`
/// equals `$name`. Unknown names are a 404.
macro_rules! with_metric_table {
    ($name:expr, |$table:ident| $body:expr) => {
        with_metric_table!(@dispatch $name, $table, $body, [
            headcount,
            employee_status,
            education,
            age_group,
            turnover,
            productivity,
            employee_cost,
            engagement,
            hcma_score,
            org_structure_score,
            org_health_score,
            culture_maturity_score,
            formation_ratio
        ])
    };
    (@dispatch $name:expr, $table:ident, $body:expr, [$($module:ident),+]) => {{
        let name: &str = $name;
        match name {
            $(
                n if n == <hcdash_db::entities::$module::Entity as hcdash_db::MetricTable>::NAME => {
                    type $table = hcdash_db::entities::$module::Entity;
                    $body
                }
            )+
            other => Err($crate::error::ApiError::NotFound(format!(
                "Unknown metric '{}'",
                other
            ))),
        }
    }};
}

pub(crate) use with_metric_table;

fn to_json<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize record: {}", e)))
}

/// Coerce a whole-number field and check it lies in `range`
fn bounded_int(
    raw: &Map<String, Value>,
    name: &'static str,
    range: std::ops::RangeInclusive<i32>,
) -> Result<i32, InvalidField> {
    match coerce_field(raw.get(name), &FieldSpec::int(name)) {
        FieldValue::Valid(n) => {
            let value = n.as_f64() as i32;
            if range.contains(&value) {
                Ok(value)
            } else {
                Err(InvalidField::new(
                    name,
                    format!("must be between {} and {}", range.start(), range.end()),
                ))
            }
        }
        FieldValue::Invalid(e) => Err(e),
    }
}

pub fn parse_year(raw: &Map<String, Value>) -> Result<i32, InvalidField> {
    bounded_int(raw, "year", MIN_YEAR..=MAX_YEAR)
}

pub fn parse_month(raw: &Map<String, Value>) -> Result<i32, InvalidField> {
    bounded_int(raw, "month", 1..=12)
}

pub fn parse_quarter(raw: &Map<String, Value>) -> Result<i32, InvalidField> {
    bounded_int(raw, "quarter", 1..=4)
}

/// `companyId` carried in a body; absent or null means "not given"
pub fn body_company_id(raw: &Map<String, Value>) -> ApiResult<Option<i32>> {
    match raw.get("companyId") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => match coerce_field(Some(value), &FieldSpec::int("companyId")) {
            FieldValue::Valid(n) => Ok(Some(n.as_f64() as i32)),
            FieldValue::Invalid(e) => Err(ApiError::InvalidFields(vec![e])),
        },
    }
}

/// Period part of a key for a table of `grain`
pub fn parse_period(
    grain: Grain,
    raw: &Map<String, Value>,
) -> Result<(i32, Option<i32>), Vec<InvalidField>> {
    let year = parse_year(raw);
    let month = match grain {
        Grain::Monthly => parse_month(raw).map(Some),
        Grain::Yearly => Ok(None),
    };

    match (year, month) {
        (Ok(year), Ok(month)) => Ok((year, month)),
        (year, month) => Err(year.err().into_iter().chain(month.err()).collect()),
    }
}

/// Row stored for one key, or `null`
pub async fn read_record<E>(db: &DatabaseConnection, key: &PeriodKey) -> ApiResult<Value>
where
    E: MetricTable,
    E::Model: Serialize,
{
    debug!("Reading {} for {:?}", E::NAME, key);
    let row = repository::find_metric::<E, _>(db, key).await?;
    to_json(row)
}

/// Validate `raw` and upsert it into `E`, returning the stored row
pub async fn write_record<E>(
    db: &DatabaseConnection,
    scope: &Scope,
    raw: &Map<String, Value>,
) -> ApiResult<Value>
where
    E: MetricTable,
    E::Model: Serialize + IntoActiveModel<E::Active>,
{
    let company_id = scope.write_company(body_company_id(raw)?)?;

    let period = parse_period(E::GRAIN, raw);
    let record = coerce_record(raw, E::FIELDS);

    let (key, record) = match (period, record) {
        (Ok((year, month)), Ok(record)) => (
            PeriodKey {
                year,
                month,
                company_id,
            },
            record,
        ),
        (period, record) => {
            let errors = period
                .err()
                .unwrap_or_default()
                .into_iter()
                .chain(record.err().unwrap_or_default())
                .collect();
            return Err(ApiError::InvalidFields(errors));
        }
    };

    let saved = repository::upsert_metric::<E, _>(db, &key, &record).await?;

    info!(
        "User {} saved {} for {:?}",
        scope.user.user_id,
        E::NAME,
        key
    );

    to_json(saved)
}
