//! Summing monthly rows into period totals

use std::collections::BTreeMap;

/// Over-achievement on a KPI counts for at most 110%.
pub const KPI_ACHIEVEMENT_CAP: f64 = 1.10;

/// A stored per-month metric row whose numeric columns can be read by name.
pub trait MetricRow {
    fn company_id(&self) -> i32;

    fn month(&self) -> u32;

    /// Numeric value of `column`, `None` if the row has no such column.
    fn value(&self, column: &str) -> Option<f64>;
}

/// Sum `columns` over the rows whose month is in `months`.
///
/// Every requested column is present in the result. Columns with no
/// matching rows are 0.0, so an empty period still has a well-formed shape.
pub fn sum_columns<R: MetricRow>(
    rows: &[R],
    months: &[u32],
    columns: &[&str],
) -> BTreeMap<String, f64> {
    sum_rows(rows.iter().filter(|r| months.contains(&r.month())), columns)
}

fn sum_rows<'a, R, I>(rows: I, columns: &[&str]) -> BTreeMap<String, f64>
where
    R: MetricRow + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut totals: BTreeMap<String, f64> =
        columns.iter().map(|c| (c.to_string(), 0.0)).collect();

    for row in rows {
        for column in columns {
            if let (Some(v), Some(total)) = (row.value(column), totals.get_mut(*column)) {
                *total += v;
            }
        }
    }

    totals
}

/// One value of `column` per month in `months`, 0.0 where no row exists.
pub fn monthly_series<R: MetricRow>(rows: &[R], months: &[u32], column: &str) -> Vec<f64> {
    months
        .iter()
        .map(|m| {
            rows.iter()
                .filter(|r| r.month() == *m)
                .filter_map(|r| r.value(column))
                .sum()
        })
        .collect()
}

/// Which month of a period a stock metric is read at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAt {
    Earliest,
    Latest,
}

/// One row per company: its earliest or latest month of `months` that has data.
pub fn stock_rows<'a, R: MetricRow>(rows: &'a [R], months: &[u32], at: StockAt) -> Vec<&'a R> {
    let mut picked: BTreeMap<i32, &R> = BTreeMap::new();

    for row in rows.iter().filter(|r| months.contains(&r.month())) {
        let replace = match picked.get(&row.company_id()) {
            None => true,
            Some(current) => match at {
                StockAt::Earliest => row.month() < current.month(),
                StockAt::Latest => row.month() > current.month(),
            },
        };
        if replace {
            picked.insert(row.company_id(), row);
        }
    }

    picked.into_values().collect()
}

/// Sum of stock `columns` across companies, each read at its own edge of
/// the period. Zero-filled like [`sum_columns`].
pub fn sum_stock<R: MetricRow>(
    rows: &[R],
    months: &[u32],
    columns: &[&str],
    at: StockAt,
) -> BTreeMap<String, f64> {
    sum_rows(stock_rows(rows, months, at), columns)
}

/// Weighted contribution of one KPI, with the achievement capped to `[0, 1.10]`
pub fn kpi_contribution(weight: f64, achievement_score: f64) -> f64 {
    if !weight.is_finite() || !achievement_score.is_finite() {
        return 0.0;
    }
    weight * achievement_score.clamp(0.0, KPI_ACHIEVEMENT_CAP)
}

/// Quarter score as a percentage from `(weight, achievement_score)` pairs
pub fn kpi_quarter_percent<I>(items: I) -> f64
where
    I: IntoIterator<Item = (f64, f64)>,
{
    items
        .into_iter()
        .map(|(weight, achievement)| kpi_contribution(weight, achievement))
        .sum::<f64>()
        * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        company: i32,
        month: u32,
        revenue: f64,
        cost: f64,
    }

    impl MetricRow for Row {
        fn company_id(&self) -> i32 {
            self.company
        }

        fn month(&self) -> u32 {
            self.month
        }

        fn value(&self, column: &str) -> Option<f64> {
            match column {
                "revenue" => Some(self.revenue),
                "cost" => Some(self.cost),
                _ => None,
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { company: 1, month: 1, revenue: 100.0, cost: 40.0 },
            Row { company: 1, month: 2, revenue: 150.0, cost: 50.0 },
            Row { company: 1, month: 4, revenue: 200.0, cost: 90.0 },
        ]
    }

    #[test]
    fn test_sum_columns_within_months() {
        let totals = sum_columns(&rows(), &[1, 2, 3], &["revenue", "cost"]);
        assert_eq!(totals["revenue"], 250.0);
        assert_eq!(totals["cost"], 90.0);
    }

    #[test]
    fn test_sum_columns_zero_filled_when_empty() {
        let totals = sum_columns(&rows(), &[10, 11, 12], &["revenue", "cost"]);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["revenue"], 0.0);
        assert_eq!(totals["cost"], 0.0);

        let none: Vec<Row> = Vec::new();
        let totals = sum_columns(&none, &[], &["revenue"]);
        assert_eq!(totals["revenue"], 0.0);
    }

    #[test]
    fn test_sum_columns_unknown_column_stays_zero() {
        let totals = sum_columns(&rows(), &[1], &["headcount"]);
        assert_eq!(totals["headcount"], 0.0);
    }

    #[test]
    fn test_monthly_series_fills_gaps() {
        let series = monthly_series(&rows(), &[1, 2, 3, 4], "revenue");
        assert_eq!(series, vec![100.0, 150.0, 0.0, 200.0]);
    }

    #[test]
    fn test_stock_rows_pick_each_company_edge() {
        let data = rows();
        let latest = stock_rows(&data, &[1, 2, 3], StockAt::Latest);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].month, 2);

        let earliest = stock_rows(&data, &[1, 2, 3], StockAt::Earliest);
        assert_eq!(earliest[0].month, 1);

        assert!(stock_rows(&data, &[7, 8, 9], StockAt::Latest).is_empty());
    }

    #[test]
    fn test_sum_stock_reads_companies_at_their_own_month() {
        let data = vec![
            Row { company: 1, month: 4, revenue: 150.0, cost: 0.0 },
            Row { company: 2, month: 4, revenue: 8.0, cost: 0.0 },
            Row { company: 2, month: 5, revenue: 15.0, cost: 0.0 },
        ];

        let latest = sum_stock(&data, &[4, 5, 6], &["revenue"], StockAt::Latest);
        assert_eq!(latest["revenue"], 165.0);

        let earliest = sum_stock(&data, &[4, 5, 6], &["revenue", "cost"], StockAt::Earliest);
        assert_eq!(earliest["revenue"], 158.0);
        assert_eq!(earliest["cost"], 0.0);

        let empty = sum_stock(&data, &[10], &["revenue"], StockAt::Latest);
        assert_eq!(empty["revenue"], 0.0);
    }

    #[test]
    fn test_kpi_achievement_is_capped() {
        let contribution = kpi_contribution(0.5, 1.5);
        assert!((contribution - 0.55).abs() < 1e-12);
        assert!((kpi_contribution(0.5, 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_kpi_negative_achievement_floors_at_zero() {
        assert_eq!(kpi_contribution(0.3, -0.4), 0.0);
        assert_eq!(kpi_contribution(0.3, f64::NAN), 0.0);
    }

    #[test]
    fn test_kpi_quarter_percent() {
        let percent = kpi_quarter_percent(vec![(0.5, 1.5), (0.3, 0.8), (0.2, 1.0)]);
        // 0.55 + 0.24 + 0.20
        assert!((percent - 99.0).abs() < 1e-9);
        assert_eq!(kpi_quarter_percent(Vec::new()), 0.0);
    }
}
