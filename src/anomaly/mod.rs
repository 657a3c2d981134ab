//! Anomaly Detector - z-score then IQR screening against a baseline
//!
//! Each reading is tested against its metric's baseline:
//!
//! 1. z = (value − mean) / std_dev. |z| above the threshold (default 2.0)
//!    flags the reading and no further test runs. A zero std_dev never fires.
//! 2. Otherwise the value is checked against the IQR fence
//!    [q1 − m·iqr, q3 + m·iqr] (default m = 1.5).
//!
//! A reading therefore yields at most one anomaly. Severity comes from the
//! absolute percentage deviation from the baseline mean.

use chrono::Utc;
use tracing::{debug, info};

use crate::config::AnomalyConfig;
use crate::ids::SharedIds;
use crate::types::{Anomaly, AnomalyStatus, Baseline, Detection, IqrBounds, Reading, Severity};

/// Inclusive lower bounds of |deviation %| per severity tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityTiers {
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl SeverityTiers {
    pub fn from_config(config: &AnomalyConfig) -> Self {
        Self {
            medium: config.severity_medium_pct,
            high: config.severity_high_pct,
            critical: config.severity_critical_pct,
        }
    }

    /// Everything below the medium tier is `Low`, including deviations under
    /// 5 %, which upstream filtering normally never produces.
    pub fn classify(&self, deviation_pct: f64) -> Severity {
        let d = deviation_pct.abs();
        if d >= self.critical {
            Severity::Critical
        } else if d >= self.high {
            Severity::High
        } else if d >= self.medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

pub struct AnomalyDetector {
    zscore_threshold: f64,
    iqr_multiplier: f64,
    tiers: SeverityTiers,
    ids: SharedIds,
}

impl AnomalyDetector {
    pub fn new(config: &AnomalyConfig, ids: SharedIds) -> Self {
        Self {
            zscore_threshold: config.zscore_threshold,
            iqr_multiplier: config.iqr_multiplier,
            tiers: SeverityTiers::from_config(config),
            ids,
        }
    }

    /// Combined scan: z-score first, IQR only when z-score does not fire.
    pub fn detect(&self, readings: &[Reading], baseline: &Baseline) -> Vec<Anomaly> {
        let bounds = iqr_bounds(baseline, self.iqr_multiplier);
        let anomalies: Vec<Anomaly> = readings
            .iter()
            .filter_map(|reading| {
                let value = baseline.metric.value(reading);
                if !value.is_finite() {
                    debug!(plant = %reading.plant_id, date = %reading.date, metric = %baseline.metric, "Skipping non-finite value");
                    return None;
                }
                if let Some(z) = zscore(value, baseline).filter(|z| z.abs() > self.zscore_threshold) {
                    return Some(self.build(reading, baseline, value, Detection::ZScore { z_score: z }));
                }
                (!bounds.contains(value))
                    .then(|| self.build(reading, baseline, value, Detection::Iqr { iqr_bounds: bounds }))
            })
            .collect();

        info!(
            plant = %baseline.plant_id,
            metric = %baseline.metric,
            readings = readings.len(),
            anomalies = anomalies.len(),
            "Anomaly detection complete"
        );
        anomalies
    }

    /// Z-score test only. `threshold` overrides the configured one.
    pub fn detect_zscore(
        &self,
        readings: &[Reading],
        baseline: &Baseline,
        threshold: Option<f64>,
    ) -> Vec<Anomaly> {
        let threshold = threshold.unwrap_or(self.zscore_threshold);
        readings
            .iter()
            .filter_map(|reading| {
                let value = baseline.metric.value(reading);
                zscore(value, baseline)
                    .filter(|z| z.abs() > threshold)
                    .map(|z| self.build(reading, baseline, value, Detection::ZScore { z_score: z }))
            })
            .collect()
    }

    /// IQR fence test only. `multiplier` overrides the configured one.
    pub fn detect_iqr(
        &self,
        readings: &[Reading],
        baseline: &Baseline,
        multiplier: Option<f64>,
    ) -> Vec<Anomaly> {
        let bounds = iqr_bounds(baseline, multiplier.unwrap_or(self.iqr_multiplier));
        readings
            .iter()
            .filter_map(|reading| {
                let value = baseline.metric.value(reading);
                (value.is_finite() && !bounds.contains(value))
                    .then(|| self.build(reading, baseline, value, Detection::Iqr { iqr_bounds: bounds }))
            })
            .collect()
    }

    pub fn classify_severity(&self, deviation_pct: f64) -> Severity {
        self.tiers.classify(deviation_pct)
    }

    fn build(&self, reading: &Reading, baseline: &Baseline, value: f64, detection: Detection) -> Anomaly {
        let deviation = deviation_pct(value, baseline.mean);
        let severity = self.classify_severity(deviation);
        let anomaly_id = format!(
            "ANOM_{}_{}_{}",
            reading.plant_id,
            reading.date,
            self.ids.next_suffix()
        );
        debug!(
            id = %anomaly_id,
            method = detection.method(),
            value,
            deviation_pct = deviation,
            severity = %severity,
            "Anomaly flagged"
        );
        Anomaly {
            anomaly_id,
            plant_id: reading.plant_id.clone(),
            date: reading.date,
            metric: baseline.metric,
            actual_value: value,
            expected_value: baseline.mean,
            deviation_pct: deviation,
            severity,
            detection,
            status: AnomalyStatus::Open,
            detected_at: Utc::now(),
        }
    }
}

/// `None` when the baseline has no spread.
pub fn zscore(value: f64, baseline: &Baseline) -> Option<f64> {
    (baseline.std_dev > 0.0).then(|| (value - baseline.mean) / baseline.std_dev)
}

pub fn iqr_bounds(baseline: &Baseline, multiplier: f64) -> IqrBounds {
    IqrBounds {
        lower: baseline.q1 - multiplier * baseline.iqr,
        upper: baseline.q3 + multiplier * baseline.iqr,
    }
}

/// (value − mean) / mean · 100, or 0 when the mean is zero.
pub fn deviation_pct(value: f64, mean: f64) -> f64 {
    if mean == 0.0 {
        0.0
    } else {
        (value - mean) / mean * 100.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::types::{DateRange, InverterStatus, Metric};
    use chrono::NaiveDate;

    fn baseline() -> Baseline {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        Baseline {
            plant_id: "PLANT_001".to_string(),
            metric: Metric::PowerOutputKwh,
            period_name: "Q1_2025".to_string(),
            mean: 450.0,
            std_dev: 45.0,
            q1: 420.0,
            q2: 450.0,
            q3: 480.0,
            iqr: 60.0,
            min_val: 250.0,
            max_val: 550.0,
            samples_count: 90,
            date_range: DateRange { start: day, end: day },
            calculated_at: Utc::now(),
        }
    }

    fn reading(power: f64) -> Reading {
        Reading {
            plant_id: "PLANT_001".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 13).unwrap(),
            power_output_kwh: power,
            efficiency_pct: 18.5,
            temperature_c: 35.0,
            irradiance_w_m2: 800.0,
            inverter_status: InverterStatus::Active,
            grid_frequency_hz: 50.0,
        }
    }

    fn detector() -> AnomalyDetector {
        AnomalyDetector::new(&AnomalyConfig::default(), SequentialIds::shared())
    }

    #[test]
    fn test_zscore_anomaly_for_large_drop() {
        let anomalies = detector().detect(&[reading(250.0)], &baseline());
        assert_eq!(anomalies.len(), 1);
        let a = &anomalies[0];
        assert_eq!(a.detection.method(), "zscore");
        assert!((a.z_score().unwrap() + 4.444).abs() < 0.01);
        assert!(a.iqr_bounds().is_none());
        assert!((a.deviation_pct + 44.44).abs() < 0.01);
        assert_eq!(a.severity, Severity::High);
        assert_eq!(a.expected_value, 450.0);
        assert_eq!(a.status, AnomalyStatus::Open);
        assert_eq!(a.anomaly_id, "ANOM_PLANT_001_2025-01-13_00000001");
    }

    #[test]
    fn test_iqr_fires_only_when_zscore_does_not() {
        // z = (540 - 450) / 45 = 2.0, not > 2.0; fence upper = 480 + 90 = 570
        let none = detector().detect(&[reading(540.0)], &baseline());
        assert!(none.is_empty());

        // Wide std so z never fires, narrow IQR fence
        let mut b = baseline();
        b.std_dev = 1000.0;
        let anomalies = detector().detect(&[reading(600.0)], &b);
        assert_eq!(anomalies.len(), 1);
        let bounds = anomalies[0].iqr_bounds().unwrap();
        assert_eq!(bounds.lower, 330.0);
        assert_eq!(bounds.upper, 570.0);
        assert!(anomalies[0].z_score().is_none());
    }

    #[test]
    fn test_zero_std_never_fires_zscore() {
        let mut b = baseline();
        b.std_dev = 0.0;
        assert!(detector().detect_zscore(&[reading(10_000.0)], &b, None).is_empty());
        // IQR still catches it
        assert_eq!(detector().detect(&[reading(10_000.0)], &b).len(), 1);
    }

    #[test]
    fn test_at_most_one_anomaly_per_reading() {
        let readings: Vec<Reading> = [100.0, 250.0, 450.0, 900.0].into_iter().map(reading).collect();
        let anomalies = detector().detect(&readings, &baseline());
        assert_eq!(anomalies.len(), 3);
    }

    #[test]
    fn test_single_method_overrides() {
        let d = detector();
        let b = baseline();
        assert_eq!(d.detect_zscore(&[reading(560.0)], &b, None).len(), 1);
        assert!(d.detect_zscore(&[reading(560.0)], &b, Some(3.0)).is_empty());
        assert!(d.detect_iqr(&[reading(560.0)], &b, None).is_empty());
        assert_eq!(d.detect_iqr(&[reading(560.0)], &b, Some(1.0)).len(), 1);
    }

    #[test]
    fn test_severity_boundaries() {
        let d = detector();
        assert_eq!(d.classify_severity(5.0), Severity::Low);
        assert_eq!(d.classify_severity(9.99), Severity::Low);
        assert_eq!(d.classify_severity(10.0), Severity::Medium);
        assert_eq!(d.classify_severity(20.0), Severity::High);
        assert_eq!(d.classify_severity(50.0), Severity::Critical);
        assert_eq!(d.classify_severity(-50.0), Severity::Critical);
        assert_eq!(d.classify_severity(0.0), Severity::Low);
    }

    #[test]
    fn test_deviation_with_zero_mean() {
        assert_eq!(deviation_pct(12.0, 0.0), 0.0);
        assert!((deviation_pct(110.0, 100.0) - 10.0).abs() < 1e-9);
    }
}
