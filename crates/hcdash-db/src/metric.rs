//! Per-period metric tables behind one trait
//!
//! Every metric table has the same shape: a `(year[, month], company_id)`
//! key, a handful of numeric value columns and `updated_at`. `MetricTable`
//! exposes that shape so reads and upserts can be written once.

use hcdash_metrics::{CoercedRecord, FieldKind, FieldSpec, InvalidField, MetricRow};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, Set};
use serde::Serialize;

use crate::entities::{
    age_group, culture_maturity_score, education, employee_cost, employee_status, engagement,
    formation_ratio, hcma_score, headcount, org_health_score, org_structure_score, productivity,
    turnover,
};

/// Whether a table stores one row per month or one per year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    Monthly,
    Yearly,
}

/// Which companies a query may touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyScope {
    All,
    Company(i32),
}

impl CompanyScope {
    /// The single company this scope names, if any
    pub fn company_id(&self) -> Option<i32> {
        match self {
            CompanyScope::All => None,
            CompanyScope::Company(id) => Some(*id),
        }
    }

    pub fn condition<C: ColumnTrait>(&self, column: C) -> Condition {
        match self {
            CompanyScope::All => Condition::all(),
            CompanyScope::Company(id) => Condition::all().add(column.eq(*id)),
        }
    }
}

/// Unique key of one metric row. `month` is `None` for yearly tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodKey {
    pub year: i32,
    pub month: Option<i32>,
    pub company_id: i32,
}

impl PeriodKey {
    pub fn monthly(year: i32, month: i32, company_id: i32) -> Self {
        Self {
            year,
            month: Some(month),
            company_id,
        }
    }

    pub fn yearly(year: i32, company_id: i32) -> Self {
        Self {
            year,
            month: None,
            company_id,
        }
    }
}

pub trait MetricTable: EntityTrait {
    type Active: ActiveModelTrait<Entity = Self> + Send;

    /// Name used in URLs (`/api/input/{name}`)
    const NAME: &'static str;
    const GRAIN: Grain;
    /// Value fields, keyed by their JSON name
    const FIELDS: &'static [FieldSpec];

    fn year_column() -> Self::Column;
    fn month_column() -> Option<Self::Column>;
    fn company_column() -> Self::Column;
    fn value_columns() -> Vec<Self::Column>;

    /// Build the row to insert for `key` from validated input
    fn new_active(key: &PeriodKey, record: &CoercedRecord) -> Result<Self::Active, InvalidField>;

    fn key_columns() -> Vec<Self::Column> {
        let mut columns = vec![Self::year_column()];
        columns.extend(Self::month_column());
        columns.push(Self::company_column());
        columns
    }

    /// Condition selecting exactly the row for `key`
    fn key_condition(key: &PeriodKey) -> Condition {
        let mut condition = Condition::all()
            .add(Self::year_column().eq(key.year))
            .add(Self::company_column().eq(key.company_id));
        if let (Some(column), Some(month)) = (Self::month_column(), key.month) {
            condition = condition.add(column.eq(month));
        }
        condition
    }

    /// Condition selecting rows of `year` within `months` (ignored for yearly tables)
    fn period_condition(scope: CompanyScope, year: i32, months: &[u32]) -> Condition {
        let mut condition = Condition::all()
            .add(Self::year_column().eq(year))
            .add(scope.condition(Self::company_column()));
        if let Some(column) = Self::month_column() {
            condition = condition.add(column.is_in(months.iter().map(|m| *m as i32)));
        }
        condition
    }
}

fn required_int(record: &CoercedRecord, name: &str) -> Result<i32, InvalidField> {
    record.int(name).ok_or_else(|| InvalidField::missing(name))
}

fn required_float(record: &CoercedRecord, name: &str) -> Result<f64, InvalidField> {
    record.float(name).ok_or_else(|| InvalidField::missing(name))
}

fn required_month(key: &PeriodKey) -> Result<i32, InvalidField> {
    match key.month {
        Some(month) if (1..=12).contains(&month) => Ok(month),
        Some(_) => Err(InvalidField::new("month", "must be between 1 and 12")),
        None => Err(InvalidField::missing("month")),
    }
}

macro_rules! field_value {
    ($record:expr, $key:literal, Int) => {
        required_int($record, $key)?
    };
    ($record:expr, $key:literal, Float) => {
        required_float($record, $key)?
    };
}

macro_rules! metric_table {
    (monthly $module:ident, $name:literal, [$(($field:ident, $column:ident, $kind:ident, $key:literal)),+ $(,)?]) => {
        impl MetricTable for $module::Entity {
            type Active = $module::ActiveModel;

            const NAME: &'static str = $name;
            const GRAIN: Grain = Grain::Monthly;
            const FIELDS: &'static [FieldSpec] = &[$(FieldSpec::new($key, FieldKind::$kind)),+];

            fn year_column() -> Self::Column {
                $module::Column::Year
            }

            fn month_column() -> Option<Self::Column> {
                Some($module::Column::Month)
            }

            fn company_column() -> Self::Column {
                $module::Column::CompanyId
            }

            fn value_columns() -> Vec<Self::Column> {
                vec![$($module::Column::$column,)+ $module::Column::UpdatedAt]
            }

            fn new_active(key: &PeriodKey, record: &CoercedRecord) -> Result<Self::Active, InvalidField> {
                Ok($module::ActiveModel {
                    year: Set(key.year),
                    month: Set(required_month(key)?),
                    company_id: Set(key.company_id),
                    $($field: Set(field_value!(record, $key, $kind)),)+
                    updated_at: Set(chrono::Utc::now()),
                    ..Default::default()
                })
            }
        }

        impl MetricRow for $module::Model {
            fn company_id(&self) -> i32 {
                self.company_id
            }

            fn month(&self) -> u32 {
                self.month as u32
            }

            fn value(&self, column: &str) -> Option<f64> {
                match column {
                    $($key => Some(self.$field as f64),)+
                    _ => None,
                }
            }
        }
    };
    (yearly $module:ident, $name:literal, [$(($field:ident, $column:ident, $kind:ident, $key:literal)),+ $(,)?]) => {
        impl MetricTable for $module::Entity {
            type Active = $module::ActiveModel;

            const NAME: &'static str = $name;
            const GRAIN: Grain = Grain::Yearly;
            const FIELDS: &'static [FieldSpec] = &[$(FieldSpec::new($key, FieldKind::$kind)),+];

            fn year_column() -> Self::Column {
                $module::Column::Year
            }

            fn month_column() -> Option<Self::Column> {
                None
            }

            fn company_column() -> Self::Column {
                $module::Column::CompanyId
            }

            fn value_columns() -> Vec<Self::Column> {
                vec![$($module::Column::$column,)+ $module::Column::UpdatedAt]
            }

            fn new_active(key: &PeriodKey, record: &CoercedRecord) -> Result<Self::Active, InvalidField> {
                Ok($module::ActiveModel {
                    year: Set(key.year),
                    company_id: Set(key.company_id),
                    $($field: Set(field_value!(record, $key, $kind)),)+
                    updated_at: Set(chrono::Utc::now()),
                    ..Default::default()
                })
            }
        }
    };
}

metric_table!(monthly headcount, "headcount", [
    (male, Male, Int, "male"),
    (female, Female, Int, "female"),
]);

metric_table!(monthly employee_status, "employee-status", [
    (permanent, Permanent, Int, "permanent"),
    (contract, Contract, Int, "contract"),
]);

metric_table!(monthly education, "education", [
    (high_school, HighSchool, Int, "highSchool"),
    (diploma, Diploma, Int, "diploma"),
    (bachelor, Bachelor, Int, "bachelor"),
    (master, Master, Int, "master"),
    (doctorate, Doctorate, Int, "doctorate"),
]);

metric_table!(monthly age_group, "age-group", [
    (under_25, Under25, Int, "under_25"),
    (age_25_34, Age2534, Int, "age_25_34"),
    (age_35_44, Age3544, Int, "age_35_44"),
    (age_45_54, Age4554, Int, "age_45_54"),
    (over_55, Over55, Int, "over_55"),
]);

metric_table!(monthly turnover, "turnover", [
    (headcount_start, HeadcountStart, Int, "headcountStart"),
    (headcount_end, HeadcountEnd, Int, "headcountEnd"),
    (resignations, Resignations, Int, "resignations"),
    (terminations, Terminations, Int, "terminations"),
]);

metric_table!(monthly productivity, "productivity", [
    (revenue, Revenue, Float, "revenue"),
    (net_profit, NetProfit, Float, "netProfit"),
    (employees, Employees, Int, "employees"),
]);

metric_table!(monthly employee_cost, "employee-cost", [
    (employee_cost, EmployeeCost, Float, "employeeCost"),
    (revenue, Revenue, Float, "revenue"),
]);

metric_table!(monthly engagement, "engagement", [
    (score, Score, Float, "score"),
    (respondents, Respondents, Int, "respondents"),
]);

metric_table!(yearly hcma_score, "hcma-score", [
    (score, Score, Float, "score"),
]);

metric_table!(yearly org_structure_score, "org-structure-score", [
    (score, Score, Float, "score"),
]);

metric_table!(yearly org_health_score, "org-health-score", [
    (score, Score, Float, "score"),
]);

metric_table!(yearly culture_maturity_score, "culture-maturity-score", [
    (score, Score, Float, "score"),
]);

metric_table!(yearly formation_ratio, "formation-ratio", [
    (planned, Planned, Int, "planned"),
    (filled, Filled, Int, "filled"),
]);
