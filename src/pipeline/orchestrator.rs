//! Pipeline Orchestrator - per-plant, per-metric analysis run
//!
//! ```text
//! PHASE 1: Load plant registry and raw readings
//! PHASE 2: Group readings by plant (input order kept)
//! PHASE 3: Per plant: validate (optional), deduplicate, fill gaps (optional)
//! PHASE 4: Per plant and metric: baseline, then anomalies against it
//! PHASE 5: Per plant and metric: patterns (optional)
//! PHASE 6: Fleet-wide consolidation of patterns
//! PHASE 7: Insights and health scores per plant (optional)
//! ```
//!
//! CRITICAL GUARANTEE: nothing here returns early on a plant or metric
//! failure. Problems are recorded on the [`PipelineResult`] at the smallest
//! affected scope and the run carries on.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::source::{PlantSource, ReadingSource};
use super::summary::{IssueScope, PipelineResult};
use crate::anomaly::AnomalyDetector;
use crate::baseline::{BaselineCalculator, BaselineOutcome};
use crate::config::{AnalyticsConfig, InsightConfig, PipelineConfig};
use crate::health::HealthScorer;
use crate::ids::{RandomIds, SharedIds};
use crate::insights::InsightsEngine;
use crate::patterns::{consolidate_fleet, PatternDetector};
use crate::types::{Metric, Plant, RawReading, Reading};
use crate::validator::{FillMethod, Validator};

/// Per-run switches. Defaults follow [`PipelineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub validate: bool,
    pub fill_gaps: bool,
    pub fill_method: FillMethod,
    pub detect_patterns: bool,
    pub generate_insights: bool,
    pub score_health: bool,
}

impl From<&PipelineConfig> for RunOptions {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            validate: config.validate,
            fill_gaps: config.fill_gaps,
            fill_method: config.fill_method,
            detect_patterns: config.detect_patterns,
            generate_insights: config.generate_insights,
            score_health: config.score_health,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

/// Explicitly constructed analysis pipeline. Holds no per-run state, so one
/// instance can execute any number of runs.
pub struct Pipeline {
    validator: Validator,
    baselines: BaselineCalculator,
    anomalies: AnomalyDetector,
    patterns: PatternDetector,
    insight_config: InsightConfig,
    health: HealthScorer,
    fleet_min_plants: usize,
    ids: SharedIds,
}

impl Pipeline {
    /// Production pipeline with random identifier suffixes.
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self::with_ids(config, RandomIds::shared())
    }

    /// Pipeline drawing every identifier from `ids`.
    pub fn with_ids(config: &AnalyticsConfig, ids: SharedIds) -> Self {
        Self {
            validator: Validator::new(&config.validation),
            baselines: BaselineCalculator::new(&config.baseline),
            anomalies: AnomalyDetector::new(&config.anomaly, ids.clone()),
            patterns: PatternDetector::new(&config.patterns, ids.clone()),
            insight_config: config.insights.clone(),
            health: HealthScorer::new(&config.health),
            fleet_min_plants: config.patterns.fleet_min_plants,
            ids,
        }
    }

    /// Replace the validator, e.g. to pin the future-date reference day.
    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn execute(
        &self,
        plant_source: &dyn PlantSource,
        reading_source: &dyn ReadingSource,
        metrics: &[String],
        options: &RunOptions,
    ) -> PipelineResult {
        let started_at = Utc::now();
        let mut result = PipelineResult::new(uuid::Uuid::new_v4().to_string(), started_at);
        info!(run = %result.run_id, metrics = ?metrics, ?options, "Pipeline run started");

        // ====================================================================
        // PHASE 1-2: Load and group
        // ====================================================================
        let Some(by_plant) = Self::load(plant_source, reading_source, &mut result) else {
            result.finished_at = Utc::now();
            warn!(run = %result.run_id, errors = result.errors.len(), "Pipeline run aborted at load");
            return result;
        };

        let metric_names = dedup_names(metrics);

        // ====================================================================
        // PHASE 3-5: Per plant
        // ====================================================================
        let plant_ids: Vec<String> = result.plants.keys().cloned().collect();
        for plant_id in &plant_ids {
            let raws = by_plant.get(plant_id).map_or(&[][..], Vec::as_slice);
            if raws.is_empty() {
                result.warn(IssueScope::Plant { plant_id: plant_id.clone() }, "No readings for plant");
                result.readings_by_plant.insert(plant_id.clone(), Vec::new());
                continue;
            }

            let readings = self.prepare(plant_id, raws, options, &mut result);
            self.analyze_plant(plant_id, &readings, &metric_names, options, &mut result);
            result.readings_by_plant.insert(plant_id.clone(), readings);
        }

        // ====================================================================
        // PHASE 6: Fleet consolidation
        // ====================================================================
        if options.detect_patterns {
            result.fleet_patterns = consolidate_fleet(&mut result.patterns_by_plant, self.fleet_min_plants);
        }

        // ====================================================================
        // PHASE 7: Insights and health
        // ====================================================================
        let today = started_at.date_naive();
        if options.generate_insights {
            let engine = InsightsEngine::new(&self.insight_config, self.ids.clone(), today);
            for plant_id in &plant_ids {
                let Some(readings) = result.readings_by_plant.get(plant_id) else { continue };
                let anomalies = result.anomalies_by_plant.get(plant_id).map_or(&[][..], Vec::as_slice);
                let patterns = result.patterns_by_plant.get(plant_id).map_or(&[][..], Vec::as_slice);
                let insights = engine.generate_insights(readings, anomalies, patterns);
                result.insights_by_plant.insert(plant_id.clone(), insights);
            }
        }

        if options.score_health {
            for plant_id in &plant_ids {
                self.score_plant(plant_id, today, &mut result);
            }
        }

        result.finished_at = Utc::now();
        info!(
            run = %result.run_id,
            plants = result.plants.len(),
            readings = result.total_readings(),
            anomalies = result.anomaly_summary().total,
            patterns = result.total_patterns(),
            insights = result.total_insights(),
            warnings = result.warnings.len(),
            errors = result.errors.len(),
            success = result.success(),
            "Pipeline run complete"
        );
        result
    }

    /// Registry into `result.plants`, readings grouped by plant.
    ///
    /// `None` when either source is unavailable.
    fn load(
        plant_source: &dyn PlantSource,
        reading_source: &dyn ReadingSource,
        result: &mut PipelineResult,
    ) -> Option<BTreeMap<String, Vec<RawReading>>> {
        let plants = match plant_source.load_plants() {
            Ok(loaded) => loaded,
            Err(e) => {
                result.error(IssueScope::Source { name: plant_source.source_name() }, e.to_string());
                return None;
            }
        };
        let readings = match reading_source.load_readings() {
            Ok(loaded) => loaded,
            Err(e) => {
                result.error(IssueScope::Source { name: reading_source.source_name() }, e.to_string());
                return None;
            }
        };

        for skipped in plants.skipped {
            result.warn(IssueScope::Source { name: plant_source.source_name() }, skipped.to_string());
        }
        for skipped in readings.skipped {
            result.warn(IssueScope::Source { name: reading_source.source_name() }, skipped.to_string());
        }

        for plant in plants.records {
            if result.plants.contains_key(&plant.plant_id) {
                result.warn(
                    IssueScope::Plant { plant_id: plant.plant_id.clone() },
                    "Duplicate registry entry ignored",
                );
                continue;
            }
            result.plants.insert(plant.plant_id.clone(), plant);
        }

        let mut by_plant: BTreeMap<String, Vec<RawReading>> = BTreeMap::new();
        for raw in readings.records {
            by_plant.entry(raw.plant_id.clone()).or_default().push(raw);
        }

        for (plant_id, raws) in &by_plant {
            if !result.plants.contains_key(plant_id) {
                result.warn(
                    IssueScope::Plant { plant_id: plant_id.clone() },
                    format!("{} readings for unregistered plant ignored", raws.len()),
                );
            }
        }
        Some(by_plant)
    }

    /// Validate or convert, deduplicate, optionally fill gaps.
    fn prepare(
        &self,
        plant_id: &str,
        raws: &[RawReading],
        options: &RunOptions,
        result: &mut PipelineResult,
    ) -> Vec<Reading> {
        let typed = if options.validate {
            let report = self.validator.partition(raws);
            if !report.rejected.is_empty() {
                let reason = report.primary_rejection_reason().unwrap_or_default();
                result.warn(
                    IssueScope::Plant { plant_id: plant_id.to_string() },
                    format!("{} invalid readings removed (most common: {reason})", report.rejected.len()),
                );
            }
            report.valid
        } else {
            let mut typed = Vec::with_capacity(raws.len());
            for raw in raws {
                match Validator::convert_unchecked(raw) {
                    Ok(reading) => typed.push(reading),
                    Err(e) => result.warn(
                        IssueScope::Reading { plant_id: plant_id.to_string(), date: raw.date.clone() },
                        e.to_string(),
                    ),
                }
            }
            typed
        };

        let mut readings = Validator::remove_duplicates(&typed);
        if readings.len() < typed.len() {
            debug!(plant = %plant_id, removed = typed.len() - readings.len(), "Duplicate readings removed");
        }

        if options.fill_gaps {
            let before = readings.len();
            readings = Validator::fill_date_gaps(&readings, options.fill_method);
            debug!(plant = %plant_id, filled = readings.len() - before, method = ?options.fill_method, "Date gaps filled");
        }
        readings
    }

    /// Baselines, anomalies and patterns for every requested metric.
    fn analyze_plant(
        &self,
        plant_id: &str,
        readings: &[Reading],
        metric_names: &[String],
        options: &RunOptions,
        result: &mut PipelineResult,
    ) {
        let mut baselines = BTreeMap::new();
        let mut anomalies = Vec::new();
        let mut patterns = Vec::new();

        for name in metric_names {
            let scope = || IssueScope::Metric { plant_id: plant_id.to_string(), metric: name.clone() };
            match self.baselines.evaluate(readings, plant_id, name, None) {
                BaselineOutcome::Computed(baseline) => {
                    anomalies.extend(self.anomalies.detect(readings, &baseline));
                    baselines.insert(baseline.metric, baseline);
                }
                BaselineOutcome::InsufficientData { have, need } => {
                    result.warn(scope(), format!("Insufficient data for baseline: have {have}, need {need}"));
                }
                BaselineOutcome::InvalidMetric(metric) => {
                    result.error(scope(), format!("Unknown metric '{metric}'"));
                    continue;
                }
                BaselineOutcome::Failed(e) => {
                    result.error(scope(), e.to_string());
                }
            }

            if options.detect_patterns {
                if let Ok(metric) = name.parse::<Metric>() {
                    patterns.extend(self.patterns.detect(plant_id, readings, metric));
                }
            }
        }

        info!(
            plant = %plant_id,
            readings = readings.len(),
            baselines = baselines.len(),
            anomalies = anomalies.len(),
            patterns = patterns.len(),
            "Plant analysed"
        );
        result.baselines_by_plant.insert(plant_id.to_string(), baselines);
        result.anomalies_by_plant.insert(plant_id.to_string(), anomalies);
        if options.detect_patterns {
            result.patterns_by_plant.insert(plant_id.to_string(), patterns);
        }
    }

    /// Health score plus the plant's run-status fields.
    fn score_plant(&self, plant_id: &str, today: NaiveDate, result: &mut PipelineResult) {
        let readings = result.readings_by_plant.get(plant_id).map_or(&[][..], Vec::as_slice);
        let anomalies = result.anomalies_by_plant.get(plant_id).map_or(&[][..], Vec::as_slice);
        let patterns = result.patterns_by_plant.get(plant_id).map_or(&[][..], Vec::as_slice);

        let Some(score) = self.health.score(plant_id, readings, anomalies, patterns, today) else {
            return;
        };

        let last = score.period_analyzed.end;
        let since = |days: u64| last.checked_sub_days(Days::new(days - 1)).unwrap_or(last);
        let count_7d = result.anomalies_since(plant_id, since(7));
        let count_30d = result.anomalies_since(plant_id, since(30));

        if let Some(plant) = result.plants.get_mut(plant_id) {
            update_status(plant, score.overall_score, last, count_7d, count_30d);
        }
        result.health_scores.insert(plant_id.to_string(), score);
    }
}

fn update_status(plant: &mut Plant, score: f64, last: NaiveDate, count_7d: usize, count_30d: usize) {
    plant.current_health_score = score;
    plant.last_analysis_date = Some(last);
    plant.anomaly_count_7d = count_7d;
    plant.anomaly_count_30d = count_30d;
}

/// Requested metric names without repeats, first occurrence kept.
fn dedup_names(metrics: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(metrics.len());
    for m in metrics {
        if !names.contains(m) {
            names.push(m.clone());
        }
    }
    names
}
