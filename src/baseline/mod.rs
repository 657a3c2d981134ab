//! Baseline Module - per plant / metric / period statistical reference
//!
//! A baseline captures the normal behaviour of one metric at one plant over a
//! window of daily readings. Anomaly detection compares individual readings
//! against it.
//!
//! ## Architecture
//!
//! - `BaselineCalculator`: computes a fresh [`Baseline`] from a window
//! - `BaselineOutcome`: tagged result the pipeline branches on instead of
//!   matching error types for normal "skip this metric" flow
//!
//! ## Key Features
//!
//! - Population standard deviation, linear-interpolated quartiles
//! - Minimum of 13 samples (configurable upwards, never below)
//! - Quarter-based period naming (`Q1_2025`) when no name is supplied
//! - Rolling refresh = full recomputation over the supplied window
//!
//! ## Usage
//!
//! ```ignore
//! let calculator = BaselineCalculator::new(&config.baseline);
//! match calculator.evaluate(&readings, "PLANT_001", "power_output_kwh", None) {
//!     BaselineOutcome::Computed(baseline) => { /* detect anomalies */ }
//!     BaselineOutcome::InsufficientData { have, need } => { /* warn + skip */ }
//!     BaselineOutcome::InvalidMetric(name) => { /* error */ }
//!     BaselineOutcome::Failed(e) => { /* error */ }
//! }
//! ```

use chrono::{Datelike, NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{defaults, BaselineConfig};
use crate::stats::{self, Quartiles};
use crate::types::{Baseline, DateRange, Metric, Reading};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BaselineError {
    #[error("Insufficient samples for metric {0}: have {1}, need {2}")]
    InsufficientSamples(String, usize, usize),

    #[error("Non-finite {0} value on {1}")]
    NonFiniteValue(String, NaiveDate),
}

/// Outcome of a baseline attempt for one (plant, metric).
#[derive(Debug, Clone, PartialEq)]
pub enum BaselineOutcome {
    Computed(Baseline),
    /// Too few readings; the metric is skipped, not failed
    InsufficientData { have: usize, need: usize },
    /// Metric name outside the known set
    InvalidMetric(String),
    /// Any other failure while computing
    Failed(BaselineError),
}

// ============================================================================
// Calculator
// ============================================================================

#[derive(Debug, Clone)]
pub struct BaselineCalculator {
    min_samples: usize,
}

impl Default for BaselineCalculator {
    fn default() -> Self {
        Self::new(&BaselineConfig::default())
    }
}

impl BaselineCalculator {
    /// Values below the hard floor of 13 are raised to it.
    pub fn new(config: &BaselineConfig) -> Self {
        Self {
            min_samples: config.min_samples.max(defaults::MIN_BASELINE_SAMPLES),
        }
    }

    pub const fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Compute a baseline over `readings` for `metric`.
    ///
    /// `period_name` defaults to the quarter of the earliest reading.
    pub fn calculate(
        &self,
        readings: &[Reading],
        plant_id: &str,
        metric: Metric,
        period_name: Option<&str>,
    ) -> Result<Baseline, BaselineError> {
        if readings.len() < self.min_samples {
            return Err(BaselineError::InsufficientSamples(
                metric.to_string(),
                readings.len(),
                self.min_samples,
            ));
        }

        if let Some(bad) = readings.iter().find(|r| !metric.value(r).is_finite()) {
            return Err(BaselineError::NonFiniteValue(metric.to_string(), bad.date));
        }

        let values = metric.values(readings);
        let sorted = stats::sorted_copy(&values);
        let quartiles = Quartiles {
            q1: stats::percentile_sorted(&sorted, 25.0),
            q2: stats::percentile_sorted(&sorted, 50.0),
            q3: stats::percentile_sorted(&sorted, 75.0),
        };

        // Non-empty: length checked against min_samples (>= 13) above
        let date_range = DateRange::spanning(readings.iter().map(|r| r.date))
            .ok_or_else(|| BaselineError::InsufficientSamples(metric.to_string(), 0, self.min_samples))?;

        let period_name = period_name.map_or_else(|| infer_period_name(date_range.start), str::to_string);

        let baseline = Baseline {
            plant_id: plant_id.to_string(),
            metric,
            period_name,
            mean: stats::mean(&values),
            std_dev: stats::population_std_dev(&values),
            q1: quartiles.q1,
            q2: quartiles.q2,
            q3: quartiles.q3,
            iqr: quartiles.iqr(),
            min_val: sorted[0],
            max_val: sorted[sorted.len() - 1],
            samples_count: values.len(),
            date_range,
            calculated_at: Utc::now(),
        };

        info!(
            plant = %plant_id,
            metric = %metric,
            period = %baseline.period_name,
            samples = baseline.samples_count,
            mean = baseline.mean,
            std_dev = baseline.std_dev,
            "Baseline calculated"
        );
        Ok(baseline)
    }

    /// [`calculate`](Self::calculate) with an explicit period label.
    pub fn calculate_for_period(
        &self,
        readings: &[Reading],
        plant_id: &str,
        metric: Metric,
        period_name: &str,
    ) -> Result<Baseline, BaselineError> {
        self.calculate(readings, plant_id, metric, Some(period_name))
    }

    /// Baseline attempt keyed by metric name, for callers that branch on
    /// the outcome instead of error types.
    pub fn evaluate(
        &self,
        readings: &[Reading],
        plant_id: &str,
        metric_name: &str,
        period_name: Option<&str>,
    ) -> BaselineOutcome {
        let Ok(metric) = metric_name.parse::<Metric>() else {
            return BaselineOutcome::InvalidMetric(metric_name.to_string());
        };
        match self.calculate(readings, plant_id, metric, period_name) {
            Ok(baseline) => BaselineOutcome::Computed(baseline),
            Err(BaselineError::InsufficientSamples(_, have, need)) => {
                BaselineOutcome::InsufficientData { have, need }
            }
            Err(e) => BaselineOutcome::Failed(e),
        }
    }

    /// Refresh a baseline from a new window of readings.
    ///
    /// History is not merged: the result is a full recomputation over
    /// `new_readings` alone, keeping the plant, metric and period label.
    pub fn update_rolling(
        &self,
        baseline: &Baseline,
        new_readings: &[Reading],
    ) -> Result<Baseline, BaselineError> {
        debug!(
            plant = %baseline.plant_id,
            metric = %baseline.metric,
            previous_samples = baseline.samples_count,
            new_samples = new_readings.len(),
            "Rolling baseline refresh"
        );
        self.calculate(
            new_readings,
            &baseline.plant_id,
            baseline.metric,
            Some(&baseline.period_name),
        )
    }
}

/// `Q{quarter}_{year}` for the quarter containing `date`.
pub fn infer_period_name(date: NaiveDate) -> String {
    format!("Q{}_{}", date.month0() / 3 + 1, date.year())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InverterStatus;

    fn readings(values: &[f64]) -> Vec<Reading> {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        values
            .iter()
            .zip(start.iter_days())
            .map(|(&v, date)| Reading {
                plant_id: "PLANT_001".to_string(),
                date,
                power_output_kwh: v,
                efficiency_pct: 18.5,
                temperature_c: 35.0,
                irradiance_w_m2: 800.0,
                inverter_status: InverterStatus::Active,
                grid_frequency_hz: 50.0,
            })
            .collect()
    }

    #[test]
    fn test_baseline_statistics() {
        let values: Vec<f64> = (1..=13).map(f64::from).collect();
        let b = BaselineCalculator::default()
            .calculate(&readings(&values), "PLANT_001", Metric::PowerOutputKwh, None)
            .unwrap();
        assert_eq!(b.samples_count, 13);
        assert!((b.mean - 7.0).abs() < 1e-9);
        assert!((b.std_dev - 14.0_f64.sqrt()).abs() < 1e-9, "population std of 1..=13 is sqrt(14)");
        assert_eq!(b.q1, 4.0);
        assert_eq!(b.q2, 7.0);
        assert_eq!(b.q3, 10.0);
        assert_eq!(b.iqr, 6.0);
        assert_eq!(b.min_val, 1.0);
        assert_eq!(b.max_val, 13.0);
        assert_eq!(b.period_name, "Q1_2025");
        assert_eq!(b.date_range.to_string(), "2025-01-01 to 2025-01-13");
    }

    #[test]
    fn test_twelve_samples_rejected() {
        let err = BaselineCalculator::default()
            .calculate(&readings(&[1.0; 12]), "P", Metric::PowerOutputKwh, None)
            .unwrap_err();
        assert_eq!(
            err,
            BaselineError::InsufficientSamples("power_output_kwh".to_string(), 12, 13)
        );
    }

    #[test]
    fn test_quartile_ordering_holds_for_skewed_data() {
        let values = [1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0, 89.0, 144.0];
        let b = BaselineCalculator::default()
            .calculate(&readings(&values), "P", Metric::PowerOutputKwh, None)
            .unwrap();
        assert!(b.min_val <= b.q1 && b.q1 <= b.q2 && b.q2 <= b.q3 && b.q3 <= b.max_val);
    }

    #[test]
    fn test_quartile_ordering_over_random_samples() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let calc = BaselineCalculator::default();
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let len = rng.gen_range(13..200);
            // cubing skews the draws and mixes signs
            let values: Vec<f64> = (0..len).map(|_| rng.gen_range(-10.0..10.0_f64).powi(3)).collect();
            let b = calc
                .calculate(&readings(&values), "P", Metric::PowerOutputKwh, None)
                .unwrap();
            assert!(
                b.min_val <= b.q1 && b.q1 <= b.q2 && b.q2 <= b.q3 && b.q3 <= b.max_val,
                "seed {seed}: {} {} {} {} {}",
                b.min_val,
                b.q1,
                b.q2,
                b.q3,
                b.max_val
            );
            assert!(b.iqr >= 0.0 && b.std_dev >= 0.0, "seed {seed}");
            assert_eq!(b.samples_count, len);
        }
    }

    #[test]
    fn test_explicit_period_name() {
        let b = BaselineCalculator::default()
            .calculate_for_period(&readings(&[5.0; 13]), "P", Metric::EfficiencyPct, "commissioning")
            .unwrap();
        assert_eq!(b.period_name, "commissioning");
        assert_eq!(b.metric, Metric::EfficiencyPct);
        assert_eq!(b.std_dev, 0.0);
    }

    #[test]
    fn test_min_samples_floor() {
        let calc = BaselineCalculator::new(&BaselineConfig { min_samples: 3 });
        assert_eq!(calc.min_samples(), 13);
    }

    #[test]
    fn test_evaluate_outcomes() {
        let calc = BaselineCalculator::default();
        let data = readings(&[1.0; 13]);
        assert!(matches!(
            calc.evaluate(&data, "P", "power_output_kwh", None),
            BaselineOutcome::Computed(_)
        ));
        assert_eq!(
            calc.evaluate(&data[..5], "P", "power_output_kwh", None),
            BaselineOutcome::InsufficientData { have: 5, need: 13 }
        );
        assert_eq!(
            calc.evaluate(&data, "P", "wind_speed", None),
            BaselineOutcome::InvalidMetric("wind_speed".to_string())
        );

        let mut bad = data;
        bad[3].power_output_kwh = f64::NAN;
        assert!(matches!(
            calc.evaluate(&bad, "P", "power_output_kwh", None),
            BaselineOutcome::Failed(BaselineError::NonFiniteValue(_, _))
        ));
    }

    #[test]
    fn test_update_rolling_discards_history() {
        let calc = BaselineCalculator::default();
        let old = calc
            .calculate(&readings(&[100.0; 13]), "P", Metric::PowerOutputKwh, Some("Q1_2025"))
            .unwrap();
        let refreshed = calc.update_rolling(&old, &readings(&[200.0; 13])).unwrap();
        assert_eq!(refreshed.mean, 200.0, "only the new window counts");
        assert_eq!(refreshed.period_name, "Q1_2025");
        assert_eq!(refreshed.samples_count, 13);
    }

    #[test]
    fn test_infer_period_name_quarters() {
        assert_eq!(infer_period_name(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()), "Q1_2024");
        assert_eq!(infer_period_name(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()), "Q2_2024");
        assert_eq!(infer_period_name(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()), "Q4_2024");
    }
}
