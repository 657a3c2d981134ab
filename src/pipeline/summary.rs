//! Run result and derived summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::patterns::FleetPattern;
use crate::types::{Anomaly, Baseline, HealthScore, Insight, Metric, Pattern, Plant, Reading, Severity};

/// Smallest unit a warning or error applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum IssueScope {
    Source { name: String },
    Plant { plant_id: String },
    Metric { plant_id: String, metric: String },
    Reading { plant_id: String, date: String },
}

impl std::fmt::Display for IssueScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source { name } => write!(f, "source {name}"),
            Self::Plant { plant_id } => write!(f, "plant {plant_id}"),
            Self::Metric { plant_id, metric } => write!(f, "plant {plant_id} / {metric}"),
            Self::Reading { plant_id, date } => write!(f, "plant {plant_id} @ {date}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineIssue {
    #[serde(flatten)]
    pub scope: IssueScope,
    pub message: String,
}

impl PipelineIssue {
    pub fn new(scope: IssueScope, message: impl Into<String>) -> Self {
        Self {
            scope,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for PipelineIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.scope, self.message)
    }
}

/// Everything one pipeline run produced. Maps are keyed by plant id.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub plants: BTreeMap<String, Plant>,
    pub readings_by_plant: BTreeMap<String, Vec<Reading>>,
    pub baselines_by_plant: BTreeMap<String, BTreeMap<Metric, Baseline>>,
    pub anomalies_by_plant: BTreeMap<String, Vec<Anomaly>>,
    pub patterns_by_plant: BTreeMap<String, Vec<Pattern>>,
    pub fleet_patterns: Vec<FleetPattern>,
    pub insights_by_plant: BTreeMap<String, Vec<Insight>>,
    pub health_scores: BTreeMap<String, HealthScore>,
    pub warnings: Vec<PipelineIssue>,
    pub errors: Vec<PipelineIssue>,
}

impl PipelineResult {
    pub fn new(run_id: String, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            finished_at: started_at,
            plants: BTreeMap::new(),
            readings_by_plant: BTreeMap::new(),
            baselines_by_plant: BTreeMap::new(),
            anomalies_by_plant: BTreeMap::new(),
            patterns_by_plant: BTreeMap::new(),
            fleet_patterns: Vec::new(),
            insights_by_plant: BTreeMap::new(),
            health_scores: BTreeMap::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// A run succeeds when it recorded no errors; warnings are allowed.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn warn(&mut self, scope: IssueScope, message: impl Into<String>) {
        self.warnings.push(PipelineIssue::new(scope, message));
    }

    pub fn error(&mut self, scope: IssueScope, message: impl Into<String>) {
        self.errors.push(PipelineIssue::new(scope, message));
    }

    pub fn total_readings(&self) -> usize {
        self.readings_by_plant.values().map(Vec::len).sum()
    }

    pub fn total_insights(&self) -> usize {
        self.insights_by_plant.values().map(Vec::len).sum()
    }

    pub fn total_patterns(&self) -> usize {
        self.patterns_by_plant.values().map(Vec::len).sum()
    }

    pub fn anomaly_summary(&self) -> AnomalySummary {
        let mut summary = AnomalySummary::default();
        for (plant_id, anomalies) in &self.anomalies_by_plant {
            let plant = summary.by_plant.entry(plant_id.clone()).or_default();
            for a in anomalies {
                plant.count += 1;
                *plant.by_severity.entry(a.severity).or_default() += 1;
                *summary.by_severity.entry(a.severity).or_default() += 1;
                summary.total += 1;
            }
        }
        summary
    }

    /// Anomalies of one plant dated on or after `since`.
    pub fn anomalies_since(&self, plant_id: &str, since: NaiveDate) -> usize {
        self.anomalies_by_plant
            .get(plant_id)
            .map_or(0, |list| list.iter().filter(|a| a.date >= since).count())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnomalySummary {
    pub total: usize,
    pub by_severity: BTreeMap<Severity, usize>,
    pub by_plant: BTreeMap<String, PlantAnomalySummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlantAnomalySummary {
    pub count: usize,
    pub by_severity: BTreeMap<Severity, usize>,
}
