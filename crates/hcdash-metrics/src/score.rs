//! Qualitative bands for numeric scores
//!
//! The band edges are part of the contract. A score sitting exactly on an
//! edge belongs to the lower band on the maturity scale (`<=`) and to the
//! upper band on the percent scale (`<`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale a score family is reported on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreScale {
    /// 1.00 - 4.00 (HCMA, culture maturity)
    Maturity,
    /// 0 - 100 (org structure, org health, engagement)
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreBand {
    #[serde(rename = "N/A")]
    NotAvailable,
    Low,
    Medium,
    Good,
    Excellence,
}

impl ScoreBand {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::NotAvailable => "N/A",
            ScoreBand::Low => "Low",
            ScoreBand::Medium => "Medium",
            ScoreBand::Good => "Good",
            ScoreBand::Excellence => "Excellence",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map `score` to its band on `scale`
pub fn classify(score: f64, scale: ScoreScale) -> ScoreBand {
    if !score.is_finite() {
        return ScoreBand::NotAvailable;
    }

    match scale {
        ScoreScale::Maturity => {
            if !(1.0..=4.0).contains(&score) {
                ScoreBand::NotAvailable
            } else if score <= 1.75 {
                ScoreBand::Low
            } else if score <= 2.50 {
                ScoreBand::Medium
            } else if score <= 3.25 {
                ScoreBand::Good
            } else {
                ScoreBand::Excellence
            }
        }
        ScoreScale::Percent => {
            if !(0.0..=100.0).contains(&score) {
                ScoreBand::NotAvailable
            } else if score < 60.0 {
                ScoreBand::Low
            } else if score < 75.0 {
                ScoreBand::Medium
            } else if score < 90.0 {
                ScoreBand::Good
            } else {
                ScoreBand::Excellence
            }
        }
    }
}
