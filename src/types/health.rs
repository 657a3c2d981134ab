//! Per-plant health score.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// All component scores are 0-100, higher is healthier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub plant_id: String,
    pub anomaly_frequency_score: f64,
    pub anomaly_severity_score: f64,
    pub trend_score: f64,
    pub overall_score: f64,
    /// Overall score over the last 7 days minus the full-period score
    pub score_trend_7d: f64,
    /// Overall score over the last 30 days minus the full-period score
    pub score_trend_30d: f64,
    pub health_status: HealthStatus,
    pub calculation_date: NaiveDate,
    pub period_analyzed: DateRange,
}
