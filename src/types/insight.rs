//! Explained findings synthesised from anomalies and patterns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DateRange, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    PatternExplanation,
    AnomalyCauseHypothesis,
    PerformanceTrend,
    MaintenanceRecommendation,
}

/// Triage priority of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

impl Urgency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<Severity> for Urgency {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => Self::Low,
            Severity::Medium => Self::Medium,
            Severity::High => Self::High,
            Severity::Critical => Self::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub insight_id: String,
    pub plant_id: String,
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub reasoning: String,
    pub business_impact: String,
    /// 0-100
    pub confidence: f64,
    pub recommended_action: Option<String>,
    pub urgency: Urgency,
    pub linked_anomalies: Vec<String>,
    pub linked_patterns: Vec<String>,
    pub generation_date: NaiveDate,
    pub applicable_date_range: Option<DateRange>,
}
