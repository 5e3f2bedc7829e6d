//! Period selectors and their expansion into calendar months

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const QUARTERS: [[u32; 3]; 4] = [[1, 2, 3], [4, 5, 6], [7, 8, 9], [10, 11, 12]];
const SEMESTERS: [[u32; 6]; 2] = [[1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12]];

/// Granularity of a period selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Monthly,
    Quarterly,
    Semesterly,
    Yearly,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Monthly => "monthly",
            PeriodType::Quarterly => "quarterly",
            PeriodType::Semesterly => "semesterly",
            PeriodType::Yearly => "yearly",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Unknown period type '{0}'. Expected monthly, quarterly, semesterly or yearly")]
    UnknownType(String),
}

impl FromStr for PeriodType {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(PeriodType::Monthly),
            "quarterly" => Ok(PeriodType::Quarterly),
            "semesterly" => Ok(PeriodType::Semesterly),
            "yearly" => Ok(PeriodType::Yearly),
            other => Err(PeriodError::UnknownType(other.to_string())),
        }
    }
}

/// A `{type, value, year}` selector as sent by the dashboard filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(rename = "type")]
    pub kind: PeriodType,
    /// Month (1-12), quarter (1-4) or semester (1-2). Ignored for yearly.
    pub value: i32,
    pub year: i32,
}

impl Period {
    pub fn new(kind: PeriodType, value: i32, year: i32) -> Self {
        Self { kind, value, year }
    }

    /// Calendar months (1-12) covered by this period, in ascending order.
    ///
    /// An out-of-range `value` gives an empty list. Callers treat that as
    /// "no data", not as an error.
    pub fn months(&self) -> Vec<u32> {
        let index = self.value - 1;
        match self.kind {
            PeriodType::Monthly => {
                if (1..=12).contains(&self.value) {
                    vec![self.value as u32]
                } else {
                    Vec::new()
                }
            }
            PeriodType::Quarterly => usize::try_from(index)
                .ok()
                .and_then(|i| QUARTERS.get(i))
                .map(|q| q.to_vec())
                .unwrap_or_default(),
            PeriodType::Semesterly => usize::try_from(index)
                .ok()
                .and_then(|i| SEMESTERS.get(i))
                .map(|s| s.to_vec())
                .unwrap_or_default(),
            PeriodType::Yearly => (1..=12).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.months().is_empty()
    }
}

/// Quarter (1-4) a calendar month falls in, `None` for months outside 1-12
pub fn quarter_of(month: u32) -> Option<u32> {
    match month {
        1..=12 => Some((month - 1) / 3 + 1),
        _ => None,
    }
}
