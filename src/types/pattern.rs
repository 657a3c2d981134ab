//! Recurring behaviour extracted from long reading series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Seasonal,
    WeeklyCycle,
    Degradation,
}

impl PatternType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seasonal => "seasonal",
            Self::WeeklyCycle => "weekly_cycle",
            Self::Degradation => "degradation",
        }
    }

    /// Upper-case tag embedded in pattern identifiers.
    pub const fn id_tag(self) -> &'static str {
        match self {
            Self::Seasonal => "SEASONAL",
            Self::WeeklyCycle => "WEEKLY_CYCLE",
            Self::Degradation => "DEGRADATION",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternFrequency {
    Daily,
    Weekly,
    Monthly,
    Annual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// `PAT_{TYPE}_{yyyymmddHHMMSS}_{suffix}`
    pub pattern_id: String,
    pub plant_id: String,
    pub pattern_type: PatternType,
    #[serde(rename = "metric_name")]
    pub metric: Metric,
    pub description: String,
    pub frequency: PatternFrequency,
    /// Peak-to-trough spread of the grouped means; `None` for trends
    pub amplitude: Option<f64>,
    /// How statistically notable (0-100)
    pub significance_score: f64,
    /// How certain (0-100)
    pub confidence_pct: f64,
    pub first_observed_date: NaiveDate,
    pub last_observed_date: NaiveDate,
    /// Always >= 2
    pub occurrence_count: u32,
    #[serde(default)]
    pub affected_plants: Vec<String>,
    #[serde(default)]
    pub is_fleet_wide: bool,
}
