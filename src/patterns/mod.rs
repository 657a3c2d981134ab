//! Pattern Detector - recurring behaviour in long reading series
//!
//! Three independent sub-detectors run over one plant's series for one metric:
//!
//! - `seasonal`: month-of-year means deviating from the annual mean
//! - `weekly`: weekday means deviating from the weekly mean
//! - `degradation`: least-squares decline of the metric over time
//!
//! A sub-detector that fails is logged and skipped; the others still run.
//! `fleet` then marks patterns shared by several plants as fleet-wide.
//!
//! ## Usage
//!
//! ```ignore
//! let detector = PatternDetector::new(&config.patterns, ids);
//! let patterns = detector.detect("PLANT_001", &readings, Metric::PowerOutputKwh);
//! ```

mod degradation;
mod fleet;
mod seasonal;
mod weekly;

pub use fleet::{consolidate_fleet, FleetPattern};

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::PatternConfig;
use crate::ids::SharedIds;
use crate::stats;
use crate::types::{Metric, Pattern, PatternFrequency, PatternType, Reading};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    #[error("{0} detection for {1}: mean is zero, percentage deviations are undefined")]
    ZeroMean(PatternType, Metric),

    #[error("{0} detection for {1}: statistics are not finite")]
    NonFinite(PatternType, Metric),
}

// ============================================================================
// Series
// ============================================================================

/// Date-ordered finite values of one metric.
#[derive(Debug, Clone)]
pub(crate) struct Series {
    pub metric: Metric,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn from_readings(readings: &[Reading], metric: Metric) -> Self {
        let mut points: Vec<(NaiveDate, f64)> = readings
            .iter()
            .map(|r| (r.date, metric.value(r)))
            .filter(|(_, v)| v.is_finite())
            .collect();
        points.sort_by_key(|(d, _)| *d);
        let (dates, values) = points.into_iter().unzip();
        Self { metric, dates, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn span_days(&self) -> i64 {
        match (self.dates.first(), self.dates.last()) {
            (Some(first), Some(last)) => (*last - *first).num_days(),
            _ => 0,
        }
    }

    pub fn years(&self) -> f64 {
        self.span_days() as f64 / 365.25
    }

    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Percentage deviations of grouped means from their overall mean.
///
/// The divisor is the signed overall mean, so a metric centred below zero
/// yields negative deviations and never crosses a positive threshold.
#[derive(Debug, Clone)]
pub(crate) struct GroupDeviation {
    /// |group mean − overall| / overall · 100, one per group
    pub deviations: Vec<f64>,
    pub average: f64,
}

impl GroupDeviation {
    pub fn of(group_means: &[f64], pattern_type: PatternType, metric: Metric) -> Result<Self, PatternError> {
        let overall = stats::mean(group_means);
        if overall == 0.0 {
            return Err(PatternError::ZeroMean(pattern_type, metric));
        }
        let deviations: Vec<f64> = group_means
            .iter()
            .map(|m| (m - overall).abs() / overall * 100.0)
            .collect();
        let average = stats::mean(&deviations);
        if !average.is_finite() {
            return Err(PatternError::NonFinite(pattern_type, metric));
        }
        Ok(Self { deviations, average })
    }

    pub fn std_dev(&self) -> f64 {
        stats::population_std_dev(&self.deviations)
    }
}

/// Everything a sub-detector decides; identity and dates are filled in
/// by [`PatternDetector`].
#[derive(Debug, Clone)]
pub(crate) struct PatternDraft {
    pub pattern_type: PatternType,
    pub description: String,
    pub frequency: PatternFrequency,
    pub amplitude: Option<f64>,
    pub significance_score: f64,
    pub confidence_pct: f64,
    pub occurrence_count: u32,
}

// ============================================================================
// Detector
// ============================================================================

pub struct PatternDetector {
    config: PatternConfig,
    ids: SharedIds,
}

type SubDetector = fn(&Series, &PatternConfig) -> Result<Option<PatternDraft>, PatternError>;

impl PatternDetector {
    pub fn new(config: &PatternConfig, ids: SharedIds) -> Self {
        Self {
            config: config.clone(),
            ids,
        }
    }

    /// All patterns found in `readings` for `metric`.
    ///
    /// Returns nothing below the minimum reading count (default 30).
    pub fn detect(&self, plant_id: &str, readings: &[Reading], metric: Metric) -> Vec<Pattern> {
        if readings.len() < self.config.min_readings {
            debug!(
                plant = %plant_id,
                metric = %metric,
                count = readings.len(),
                need = self.config.min_readings,
                "Too few readings for pattern detection"
            );
            return Vec::new();
        }

        let series = Series::from_readings(readings, metric);
        let (Some(&first), Some(&last)) = (series.dates.first(), series.dates.last()) else {
            return Vec::new();
        };

        let detectors: [(PatternType, SubDetector); 3] = [
            (PatternType::Seasonal, seasonal::detect),
            (PatternType::WeeklyCycle, weekly::detect),
            (PatternType::Degradation, degradation::detect),
        ];

        let mut patterns = Vec::new();
        for (pattern_type, run) in detectors {
            match run(&series, &self.config) {
                Ok(Some(draft)) => patterns.push(self.assemble(plant_id, metric, first, last, draft)),
                Ok(None) => debug!(plant = %plant_id, metric = %metric, kind = %pattern_type, "No pattern"),
                Err(e) => warn!(plant = %plant_id, metric = %metric, kind = %pattern_type, error = %e, "Pattern sub-detector failed"),
            }
        }

        info!(plant = %plant_id, metric = %metric, patterns = patterns.len(), "Pattern detection complete");
        patterns
    }

    fn assemble(
        &self,
        plant_id: &str,
        metric: Metric,
        first: NaiveDate,
        last: NaiveDate,
        draft: PatternDraft,
    ) -> Pattern {
        let pattern_id = format!(
            "PAT_{}_{}_{}",
            draft.pattern_type.id_tag(),
            Utc::now().format("%Y%m%d%H%M%S"),
            self.ids.next_suffix()
        );
        Pattern {
            pattern_id,
            plant_id: plant_id.to_string(),
            pattern_type: draft.pattern_type,
            metric,
            description: draft.description,
            frequency: draft.frequency,
            amplitude: draft.amplitude,
            significance_score: draft.significance_score,
            confidence_pct: draft.confidence_pct,
            first_observed_date: first,
            last_observed_date: last,
            occurrence_count: draft.occurrence_count,
            affected_plants: vec![plant_id.to_string()],
            is_fleet_wide: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
