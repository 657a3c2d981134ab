//! Plant Health Scoring
//!
//! Deterministic, rule-based 0-100 health score per plant, built from the
//! anomalies and degradation patterns found in one analysis run.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::config::HealthConfig;
use crate::stats;
use crate::types::{Anomaly, DateRange, HealthScore, HealthStatus, Pattern, PatternType, Reading, Severity};

/// Penalty per anomaly severity, averaged into the severity score.
pub const fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Low => 10.0,
        Severity::Medium => 30.0,
        Severity::High => 60.0,
        Severity::Critical => 100.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Components {
    frequency: f64,
    severity: f64,
}

pub struct HealthScorer {
    config: HealthConfig,
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::new(&HealthConfig::default())
    }
}

impl HealthScorer {
    pub fn new(config: &HealthConfig) -> Self {
        Self { config: config.clone() }
    }

    /// Calculate a plant's health score.
    ///
    /// # Scoring Algorithm
    ///
    /// Weighted average of three factors (default weights):
    /// - 50% Anomaly frequency: share of reading days with an anomaly,
    ///   reaching zero at `max_anomaly_rate` (10 %)
    /// - 30% Anomaly severity: 100 minus the mean severity penalty
    /// - 20% Trend: 100 minus the strongest degradation significance
    ///
    /// `score_trend_7d` / `score_trend_30d` compare the last 7 / 30 days of
    /// data against the whole period; negative means recent health is worse.
    ///
    /// Returns `None` when there are no readings to score.
    pub fn score(
        &self,
        plant_id: &str,
        readings: &[Reading],
        anomalies: &[Anomaly],
        patterns: &[Pattern],
        calculation_date: NaiveDate,
    ) -> Option<HealthScore> {
        let period = DateRange::spanning(readings.iter().map(|r| r.date))?;
        let trend = self.trend_score(patterns);

        let full = self.components(readings, anomalies, None);
        let overall = self.overall(full, trend);
        let recent = |days: u64| {
            let since = period.end.checked_sub_days(Days::new(days - 1)).unwrap_or(period.start);
            self.overall(self.components(readings, anomalies, Some(since)), trend) - overall
        };

        let score = HealthScore {
            plant_id: plant_id.to_string(),
            anomaly_frequency_score: full.frequency,
            anomaly_severity_score: full.severity,
            trend_score: trend,
            overall_score: overall,
            score_trend_7d: recent(7),
            score_trend_30d: recent(30),
            health_status: self.status(overall),
            calculation_date,
            period_analyzed: period,
        };
        debug!(
            plant = %plant_id,
            overall = score.overall_score,
            status = %score.health_status,
            "Health score calculated"
        );
        Some(score)
    }

    pub fn status(&self, overall: f64) -> HealthStatus {
        if overall >= self.config.excellent_score {
            HealthStatus::Excellent
        } else if overall >= self.config.good_score {
            HealthStatus::Good
        } else if overall >= self.config.fair_score {
            HealthStatus::Fair
        } else if overall >= self.config.poor_score {
            HealthStatus::Poor
        } else {
            HealthStatus::Critical
        }
    }

    fn overall(&self, c: Components, trend: f64) -> f64 {
        (c.frequency * self.config.frequency_weight
            + c.severity * self.config.severity_weight
            + trend * self.config.trend_weight)
            .clamp(0.0, 100.0)
    }

    /// Frequency and severity over readings dated on or after `since`.
    fn components(&self, readings: &[Reading], anomalies: &[Anomaly], since: Option<NaiveDate>) -> Components {
        let in_window = |d: NaiveDate| since.map_or(true, |s| d >= s);

        let reading_days: BTreeSet<NaiveDate> = readings.iter().map(|r| r.date).filter(|d| in_window(*d)).collect();
        let window: Vec<&Anomaly> = anomalies.iter().filter(|a| in_window(a.date)).collect();
        let anomalous_days: BTreeSet<NaiveDate> = window.iter().map(|a| a.date).collect();

        let frequency = if reading_days.is_empty() {
            100.0
        } else {
            let rate = anomalous_days.len() as f64 / reading_days.len() as f64;
            100.0 * (1.0 - (rate / self.config.max_anomaly_rate).min(1.0))
        };

        let severity = if window.is_empty() {
            100.0
        } else {
            let penalties: Vec<f64> = window.iter().map(|a| severity_weight(a.severity)).collect();
            100.0 - stats::mean(&penalties)
        };

        Components { frequency, severity }
    }

    fn trend_score(&self, patterns: &[Pattern]) -> f64 {
        patterns
            .iter()
            .filter(|p| p.pattern_type == PatternType::Degradation)
            .map(|p| p.significance_score)
            .fold(None, |worst: Option<f64>, s| Some(worst.map_or(s, |w| w.max(s))))
            .map_or(100.0, |worst| (100.0 - worst).clamp(0.0, 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AnomalyStatus, Detection, InverterStatus, Metric, PatternFrequency};
    use chrono::Utc;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn readings(days: usize) -> Vec<Reading> {
        start()
            .iter_days()
            .take(days)
            .map(|date| Reading {
                plant_id: "PLANT_001".to_string(),
                date,
                power_output_kwh: 450.0,
                efficiency_pct: 18.5,
                temperature_c: 35.0,
                irradiance_w_m2: 800.0,
                inverter_status: InverterStatus::Active,
                grid_frequency_hz: 50.0,
            })
            .collect()
    }

    fn anomaly(day_offset: u64, severity: Severity) -> Anomaly {
        Anomaly {
            anomaly_id: format!("A{day_offset}"),
            plant_id: "PLANT_001".to_string(),
            date: start() + Days::new(day_offset),
            metric: Metric::PowerOutputKwh,
            actual_value: 100.0,
            expected_value: 450.0,
            deviation_pct: -77.8,
            severity,
            detection: Detection::ZScore { z_score: -7.8 },
            status: AnomalyStatus::Open,
            detected_at: Utc::now(),
        }
    }

    fn degradation(significance: f64) -> Pattern {
        Pattern {
            pattern_id: "P1".to_string(),
            plant_id: "PLANT_001".to_string(),
            pattern_type: PatternType::Degradation,
            metric: Metric::PowerOutputKwh,
            description: String::new(),
            frequency: PatternFrequency::Annual,
            amplitude: None,
            significance_score: significance,
            confidence_pct: 80.0,
            first_observed_date: start(),
            last_observed_date: start(),
            occurrence_count: 2,
            affected_plants: vec![],
            is_fleet_wide: false,
        }
    }

    #[test]
    fn test_clean_plant_is_excellent() {
        let s = HealthScorer::default()
            .score("PLANT_001", &readings(60), &[], &[], start())
            .unwrap();
        assert!((s.overall_score - 100.0).abs() < 1e-9);
        assert_eq!(s.health_status, HealthStatus::Excellent);
        assert_eq!(s.score_trend_7d, 0.0);
        assert_eq!(s.score_trend_30d, 0.0);
        assert_eq!(s.period_analyzed.days(), 59);
    }

    #[test]
    fn test_weighted_components() {
        // 5 anomalous days in 100 → rate 5% → frequency 50; all high → severity 40
        let anomalies: Vec<Anomaly> = (0..5).map(|d| anomaly(d, Severity::High)).collect();
        let s = HealthScorer::default()
            .score("PLANT_001", &readings(100), &anomalies, &[degradation(30.0)], start())
            .unwrap();
        assert!((s.anomaly_frequency_score - 50.0).abs() < 1e-9);
        assert!((s.anomaly_severity_score - 40.0).abs() < 1e-9);
        assert!((s.trend_score - 70.0).abs() < 1e-9);
        // 0.5*50 + 0.3*40 + 0.2*70 = 51
        assert!((s.overall_score - 51.0).abs() < 1e-9);
        assert_eq!(s.health_status, HealthStatus::Poor);
    }

    #[test]
    fn test_recent_anomalies_pull_short_trend_down() {
        // One critical anomaly on the last day of 100
        let s = HealthScorer::default()
            .score("PLANT_001", &readings(100), &[anomaly(99, Severity::Critical)], &[], start())
            .unwrap();
        assert!(s.score_trend_7d < s.score_trend_30d);
        assert!(s.score_trend_30d < 0.0);
    }

    #[test]
    fn test_anomaly_rate_caps_frequency_at_zero() {
        let anomalies: Vec<Anomaly> = (0..20).map(|d| anomaly(d, Severity::Critical)).collect();
        let s = HealthScorer::default()
            .score("PLANT_001", &readings(20), &anomalies, &[degradation(100.0)], start())
            .unwrap();
        assert_eq!(s.anomaly_frequency_score, 0.0);
        assert_eq!(s.anomaly_severity_score, 0.0);
        assert_eq!(s.overall_score, 0.0);
        assert_eq!(s.health_status, HealthStatus::Critical);
    }

    #[test]
    fn test_no_readings_no_score() {
        assert!(HealthScorer::default().score("PLANT_001", &[], &[], &[], start()).is_none());
    }

    #[test]
    fn test_status_tiers() {
        let h = HealthScorer::default();
        assert_eq!(h.status(85.0), HealthStatus::Excellent);
        assert_eq!(h.status(70.0), HealthStatus::Good);
        assert_eq!(h.status(55.0), HealthStatus::Fair);
        assert_eq!(h.status(40.0), HealthStatus::Poor);
        assert_eq!(h.status(39.9), HealthStatus::Critical);
    }
}
