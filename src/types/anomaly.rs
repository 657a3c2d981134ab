//! Flagged readings and their severity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Metric;

/// Categorical bucket derived from deviation magnitude.
///
/// Ordered so that `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lifecycle of an anomaly. The engine only ever creates `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyStatus {
    #[default]
    Open,
    Investigating,
    Resolved,
    FalsePositive,
}

/// Lower/upper fence of the IQR test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Which test flagged the reading, with that test's evidence.
///
/// Exactly one of z-score / IQR bounds exists per anomaly by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "detected_by")]
pub enum Detection {
    #[serde(rename = "zscore")]
    ZScore { z_score: f64 },
    #[serde(rename = "iqr")]
    Iqr { iqr_bounds: IqrBounds },
}

impl Detection {
    pub const fn method(&self) -> &'static str {
        match self {
            Self::ZScore { .. } => "zscore",
            Self::Iqr { .. } => "iqr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    /// `ANOM_{plant}_{date}_{suffix}`
    pub anomaly_id: String,
    pub plant_id: String,
    pub date: NaiveDate,
    #[serde(rename = "metric_name")]
    pub metric: Metric,
    pub actual_value: f64,
    /// Baseline mean
    pub expected_value: f64,
    pub deviation_pct: f64,
    pub severity: Severity,
    #[serde(flatten)]
    pub detection: Detection,
    #[serde(default)]
    pub status: AnomalyStatus,
    pub detected_at: DateTime<Utc>,
}

impl Anomaly {
    pub const fn z_score(&self) -> Option<f64> {
        match self.detection {
            Detection::ZScore { z_score } => Some(z_score),
            Detection::Iqr { .. } => None,
        }
    }

    pub const fn iqr_bounds(&self) -> Option<IqrBounds> {
        match self.detection {
            Detection::Iqr { iqr_bounds } => Some(iqr_bounds),
            Detection::ZScore { .. } => None,
        }
    }
}
