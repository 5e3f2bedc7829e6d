//! Derived ratios computed from stored metric totals
//!
//! All of these return `None` when the denominator is zero or the result
//! would not be finite.

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Employee cost as a percentage of revenue
pub fn employee_cost_ratio(employee_cost: f64, revenue: f64) -> Option<f64> {
    if revenue == 0.0 {
        return None;
    }
    finite(employee_cost / revenue * 100.0)
}

/// Leavers as a percentage of the average of opening and closing headcount
pub fn turnover_rate(leavers: f64, headcount_start: f64, headcount_end: f64) -> Option<f64> {
    let average = (headcount_start + headcount_end) / 2.0;
    if average == 0.0 {
        return None;
    }
    finite(leavers / average * 100.0)
}

pub fn per_employee(amount: f64, employees: f64) -> Option<f64> {
    if employees == 0.0 {
        return None;
    }
    finite(amount / employees)
}

/// Filled positions as a percentage of planned positions
pub fn formation_fill_ratio(planned: f64, filled: f64) -> Option<f64> {
    if planned == 0.0 {
        return None;
    }
    finite(filled / planned * 100.0)
}
