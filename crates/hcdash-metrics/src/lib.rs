//! Domain logic for human-capital metrics
//!
//! Everything in this crate is pure: no database, no HTTP. The API crate
//! feeds rows in and gets chart-ready numbers back.

pub mod age;
pub mod aggregate;
pub mod coerce;
pub mod period;
pub mod ratio;
pub mod score;

pub use age::AgeBand;
pub use aggregate::{
    kpi_contribution, kpi_quarter_percent, monthly_series, stock_rows, sum_columns, sum_stock,
    MetricRow, StockAt, KPI_ACHIEVEMENT_CAP,
};
pub use coerce::{
    coerce_field, coerce_record, CoercedRecord, FieldKind, FieldSpec, FieldValue, InvalidField,
    Number,
};
pub use period::{quarter_of, Period, PeriodError, PeriodType};
pub use score::{classify, ScoreBand, ScoreScale};
