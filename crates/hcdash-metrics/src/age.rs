//! Age bands used by the age-distribution metric

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    #[serde(rename = "under_25")]
    Under25,
    #[serde(rename = "age_25_34")]
    Age25To34,
    #[serde(rename = "age_35_44")]
    Age35To44,
    #[serde(rename = "age_45_54")]
    Age45To54,
    #[serde(rename = "over_55")]
    Over55,
}

impl AgeBand {
    pub const ALL: [AgeBand; 5] = [
        AgeBand::Under25,
        AgeBand::Age25To34,
        AgeBand::Age35To44,
        AgeBand::Age45To54,
        AgeBand::Over55,
    ];

    /// Column name in the `age_group` table
    pub fn key(&self) -> &'static str {
        match self {
            AgeBand::Under25 => "under_25",
            AgeBand::Age25To34 => "age_25_34",
            AgeBand::Age35To44 => "age_35_44",
            AgeBand::Age45To54 => "age_45_54",
            AgeBand::Over55 => "over_55",
        }
    }

    /// Label shown on charts
    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::Under25 => "< 25",
            AgeBand::Age25To34 => "25-34",
            AgeBand::Age35To44 => "35-44",
            AgeBand::Age45To54 => "45-54",
            AgeBand::Over55 => "≥ 55",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.key() == key)
    }

    pub fn from_age(years: u32) -> Self {
        match years {
            0..=24 => AgeBand::Under25,
            25..=34 => AgeBand::Age25To34,
            35..=44 => AgeBand::Age35To44,
            45..=54 => AgeBand::Age45To54,
            _ => AgeBand::Over55,
        }
    }
}

/// Chart label for an age-group column key. Unknown keys are returned as-is.
pub fn label_for_key(key: &str) -> &str {
    AgeBand::from_key(key).map(|b| b.label()).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_age_boundaries() {
        assert_eq!(AgeBand::from_age(24), AgeBand::Under25);
        assert_eq!(AgeBand::from_age(25), AgeBand::Age25To34);
        assert_eq!(AgeBand::from_age(34), AgeBand::Age25To34);
        assert_eq!(AgeBand::from_age(45), AgeBand::Age45To54);
        assert_eq!(AgeBand::from_age(55), AgeBand::Over55);
        assert_eq!(AgeBand::from_age(70), AgeBand::Over55);
    }

    #[test]
    fn test_key_label_lookup() {
        assert_eq!(label_for_key("age_35_44"), "35-44");
        assert_eq!(label_for_key("under_25"), "< 25");
        assert_eq!(label_for_key("unknown"), "unknown");
        for band in AgeBand::ALL {
            assert_eq!(AgeBand::from_key(band.key()), Some(band));
        }
    }
}
