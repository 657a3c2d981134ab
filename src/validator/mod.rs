//! Reading Validator - business rules, deduplication, gap filling, outlier screening
//!
//! Every reading crossing the ingestion boundary passes through here before
//! any statistics are computed.
//!
//! ## Key Features
//!
//! - Collects *all* violated rules per reading, not just the first
//! - Batch validation never short-circuits
//! - Duplicate (plant, date) removal keeping the first occurrence
//! - Calendar gap filling by linear interpolation or forward fill
//! - Z-score / IQR outlier screening over any [`Metric`]

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{defaults, ValidationConfig};
use crate::stats::{self, Quartiles};
use crate::types::{InverterStatus, Metric, RawReading, Reading, DATE_FORMAT};

// ============================================================================
// Error Types
// ============================================================================

/// A single broken business rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("plant_id is empty")]
    EmptyPlantId,

    #[error("date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("date {0} is in the future")]
    FutureDate(NaiveDate),

    #[error("power_output_kwh {0} must be a finite value >= 0")]
    InvalidPower(f64),

    #[error("efficiency_pct {0} outside [0, {1}]")]
    EfficiencyOutOfRange(f64, f64),

    #[error("temperature_c {0} outside [{1}, {2}]")]
    TemperatureOutOfRange(f64, f64, f64),

    #[error("irradiance_w_m2 {0} outside [0, {1}]")]
    IrradianceOutOfRange(f64, f64),

    #[error("inverter_status '{0}' is not one of active, inactive, fault, standby, maintenance")]
    UnknownInverterStatus(String),

    #[error("grid_frequency_hz {0} outside [{1}, {2}]")]
    GridFrequencyOutOfRange(f64, f64, f64),
}

impl Violation {
    /// Short rule name used when summarising a batch.
    pub const fn rule(&self) -> &'static str {
        match self {
            Self::EmptyPlantId => "empty plant_id",
            Self::InvalidDate(_) => "invalid date",
            Self::FutureDate(_) => "future date",
            Self::InvalidPower(_) => "invalid power output",
            Self::EfficiencyOutOfRange(..) => "efficiency out of range",
            Self::TemperatureOutOfRange(..) => "temperature out of range",
            Self::IrradianceOutOfRange(..) => "irradiance out of range",
            Self::UnknownInverterStatus(_) => "unknown inverter status",
            Self::GridFrequencyOutOfRange(..) => "grid frequency out of range",
        }
    }
}

/// Every rule a reading broke.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub plant_id: String,
    pub date: String,
    pub violations: Vec<Violation>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid reading for plant '{}' on '{}': ", self.plant_id, self.date)?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// Method Selectors
// ============================================================================

/// How missing calendar days are synthesised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Linear interpolation of every numeric field between bounding readings
    #[default]
    Interpolate,
    /// Copy of the previous day with only the date changed
    ForwardFill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlierMethod {
    ZScore,
    Iqr,
}

// ============================================================================
// Batch Report
// ============================================================================

/// Valid readings of a batch plus the rejects, in input order.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub valid: Vec<Reading>,
    pub rejected: Vec<ValidationError>,
}

impl ValidationReport {
    /// Most frequent broken rule across the rejects, e.g.
    /// `"irradiance out of range (4 readings)"`.
    pub fn primary_rejection_reason(&self) -> Option<String> {
        let mut counts: HashMap<&'static str, usize> = HashMap::new();
        for v in self.rejected.iter().flat_map(|e| &e.violations) {
            *counts.entry(v.rule()).or_default() += 1;
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(rule, count)| format!("{rule} ({count} readings)"))
    }
}

// ============================================================================
// Validator
// ============================================================================

/// Applies reading business rules against configured ranges.
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
    /// Dates after this are rejected as future dates; `None` means today's
    /// UTC date at the time of each check
    reference_date: Option<NaiveDate>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&ValidationConfig::default())
    }
}

impl Validator {
    /// Validator judging future dates against today's UTC date.
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            config: config.clone(),
            reference_date: None,
        }
    }

    /// Pin "today" for deterministic future-date checks.
    #[must_use]
    pub const fn with_reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = Some(reference_date);
        self
    }

    /// The pinned reference date, or today's UTC date.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Check one reading against every business rule.
    pub fn validate(&self, raw: &RawReading) -> Result<Reading, ValidationError> {
        let c = &self.config;
        let today = self.reference_date();
        let mut violations = Vec::new();

        if raw.plant_id.trim().is_empty() {
            violations.push(Violation::EmptyPlantId);
        }

        let date = match NaiveDate::parse_from_str(raw.date.trim(), DATE_FORMAT) {
            Ok(d) if d > today => {
                violations.push(Violation::FutureDate(d));
                None
            }
            Ok(d) => Some(d),
            Err(_) => {
                violations.push(Violation::InvalidDate(raw.date.clone()));
                None
            }
        };

        if !raw.power_output_kwh.is_finite() || raw.power_output_kwh < 0.0 {
            violations.push(Violation::InvalidPower(raw.power_output_kwh));
        }
        if !(0.0..=c.max_efficiency_pct).contains(&raw.efficiency_pct) {
            violations.push(Violation::EfficiencyOutOfRange(raw.efficiency_pct, c.max_efficiency_pct));
        }
        if !(c.min_temperature_c..=c.max_temperature_c).contains(&raw.temperature_c) {
            violations.push(Violation::TemperatureOutOfRange(
                raw.temperature_c,
                c.min_temperature_c,
                c.max_temperature_c,
            ));
        }
        if !(0.0..=c.max_irradiance_w_m2).contains(&raw.irradiance_w_m2) {
            violations.push(Violation::IrradianceOutOfRange(raw.irradiance_w_m2, c.max_irradiance_w_m2));
        }

        let status = raw.inverter_status.parse::<InverterStatus>().ok();
        if status.is_none() {
            violations.push(Violation::UnknownInverterStatus(raw.inverter_status.clone()));
        }

        if !(c.min_grid_frequency_hz..=c.max_grid_frequency_hz).contains(&raw.grid_frequency_hz) {
            violations.push(Violation::GridFrequencyOutOfRange(
                raw.grid_frequency_hz,
                c.min_grid_frequency_hz,
                c.max_grid_frequency_hz,
            ));
        }

        match (date, status) {
            (Some(date), Some(inverter_status)) if violations.is_empty() => Ok(Reading {
                plant_id: raw.plant_id.clone(),
                date,
                power_output_kwh: raw.power_output_kwh,
                efficiency_pct: raw.efficiency_pct,
                temperature_c: raw.temperature_c,
                irradiance_w_m2: raw.irradiance_w_m2,
                inverter_status,
                grid_frequency_hz: raw.grid_frequency_hz,
            }),
            _ => Err(ValidationError {
                plant_id: raw.plant_id.clone(),
                date: raw.date.clone(),
                violations,
            }),
        }
    }

    /// One result per input reading, in input order.
    pub fn validate_batch(&self, raws: &[RawReading]) -> Vec<Result<Reading, ValidationError>> {
        raws.iter().map(|r| self.validate(r)).collect()
    }

    /// Split a batch into valid readings and rejects.
    pub fn partition(&self, raws: &[RawReading]) -> ValidationReport {
        let mut report = ValidationReport::default();
        for result in self.validate_batch(raws) {
            match result {
                Ok(reading) => report.valid.push(reading),
                Err(e) => {
                    debug!(plant = %e.plant_id, date = %e.date, error = %e, "Reading rejected");
                    report.rejected.push(e);
                }
            }
        }
        report
    }

    /// Typed conversion without range checks, for runs with validation off.
    ///
    /// Only the date and inverter status must parse, since a [`Reading`]
    /// cannot represent anything else.
    pub fn convert_unchecked(raw: &RawReading) -> Result<Reading, ValidationError> {
        let date = NaiveDate::parse_from_str(raw.date.trim(), DATE_FORMAT);
        let status = raw.inverter_status.parse::<InverterStatus>();
        match (date, status) {
            (Ok(date), Ok(inverter_status)) => Ok(Reading {
                plant_id: raw.plant_id.clone(),
                date,
                power_output_kwh: raw.power_output_kwh,
                efficiency_pct: raw.efficiency_pct,
                temperature_c: raw.temperature_c,
                irradiance_w_m2: raw.irradiance_w_m2,
                inverter_status,
                grid_frequency_hz: raw.grid_frequency_hz,
            }),
            (date, status) => {
                let mut violations = Vec::new();
                if date.is_err() {
                    violations.push(Violation::InvalidDate(raw.date.clone()));
                }
                if status.is_err() {
                    violations.push(Violation::UnknownInverterStatus(raw.inverter_status.clone()));
                }
                Err(ValidationError {
                    plant_id: raw.plant_id.clone(),
                    date: raw.date.clone(),
                    violations,
                })
            }
        }
    }

    /// Readings whose `metric` value is a statistical outlier.
    ///
    /// `threshold` is the |z| cut-off for [`OutlierMethod::ZScore`] (default
    /// from config, 3.0) or the fence multiplier for [`OutlierMethod::Iqr`]
    /// (default 1.5). Fewer than 3 readings yields no outliers.
    pub fn detect_outliers<'a>(
        &self,
        readings: &'a [Reading],
        metric: Metric,
        method: OutlierMethod,
        threshold: Option<f64>,
    ) -> Vec<&'a Reading> {
        if readings.len() < defaults::MIN_READINGS_FOR_OUTLIERS {
            warn!(
                count = readings.len(),
                need = defaults::MIN_READINGS_FOR_OUTLIERS,
                "Too few readings for outlier detection"
            );
            return Vec::new();
        }

        let values = metric.values(readings);
        let is_outlier: Box<dyn Fn(f64) -> bool> = match method {
            OutlierMethod::ZScore => {
                let threshold = threshold.unwrap_or(self.config.outlier_zscore_threshold);
                let mean = stats::mean(&values);
                let std_dev = stats::population_std_dev(&values);
                if std_dev == 0.0 || !std_dev.is_finite() {
                    return Vec::new();
                }
                Box::new(move |v| ((v - mean) / std_dev).abs() > threshold)
            }
            OutlierMethod::Iqr => {
                let multiplier = threshold.unwrap_or(defaults::OUTLIER_IQR_MULTIPLIER);
                let Some(q) = Quartiles::of(&values) else {
                    return Vec::new();
                };
                let lower = q.q1 - multiplier * q.iqr();
                let upper = q.q3 + multiplier * q.iqr();
                Box::new(move |v| v < lower || v > upper)
            }
        };

        let outliers: Vec<&Reading> = readings
            .iter()
            .zip(values)
            .filter(|(_, v)| is_outlier(*v))
            .map(|(r, _)| r)
            .collect();
        debug!(metric = %metric, method = ?method, outliers = outliers.len(), "Outlier screening complete");
        outliers
    }

    /// Drop repeated (plant_id, date) pairs, keeping the first occurrence.
    ///
    /// Preserves input order; idempotent.
    pub fn remove_duplicates(readings: &[Reading]) -> Vec<Reading> {
        let mut seen: HashSet<(&str, NaiveDate)> = HashSet::with_capacity(readings.len());
        readings
            .iter()
            .filter(|r| seen.insert((r.plant_id.as_str(), r.date)))
            .cloned()
            .collect()
    }

    /// Date-sorted series with one reading for every calendar day between
    /// the earliest and latest input date.
    ///
    /// Fewer than two readings are returned unchanged. If several readings
    /// share a date the first one is used.
    pub fn fill_date_gaps(readings: &[Reading], method: FillMethod) -> Vec<Reading> {
        if readings.len() < 2 {
            return readings.to_vec();
        }

        let mut by_date: BTreeMap<NaiveDate, &Reading> = BTreeMap::new();
        for r in readings {
            by_date.entry(r.date).or_insert(r);
        }
        let (Some(&first), Some(&last)) = (by_date.keys().next(), by_date.keys().next_back()) else {
            return readings.to_vec();
        };

        let mut filled: Vec<Reading> = Vec::with_capacity(by_date.len());
        let mut synthesised = 0usize;
        for date in first.iter_days().take_while(|d| *d <= last) {
            if let Some(&r) = by_date.get(&date) {
                filled.push(r.clone());
                continue;
            }
            let before = by_date.range(..date).next_back().map(|(_, r)| *r);
            let after = by_date.range(date..).next().map(|(_, r)| *r);
            let synthetic = match (method, before, after) {
                (FillMethod::Interpolate, Some(b), Some(a)) => interpolate(b, a, date),
                // `first` is always present, so a previous day exists
                _ => match filled.last() {
                    Some(prev) => prev.with_date(date),
                    None => continue,
                },
            };
            filled.push(synthetic);
            synthesised += 1;
        }

        debug!(method = ?method, synthesised, total = filled.len(), "Filled date gaps");
        filled
    }
}

/// Linear blend of every numeric field; categorical fields from `before`.
fn interpolate(before: &Reading, after: &Reading, date: NaiveDate) -> Reading {
    let span = (after.date - before.date).num_days() as f64;
    let ratio = (date - before.date).num_days() as f64 / span;
    let lerp = |a: f64, b: f64| a + (b - a) * ratio;
    Reading {
        plant_id: before.plant_id.clone(),
        date,
        power_output_kwh: lerp(before.power_output_kwh, after.power_output_kwh),
        efficiency_pct: lerp(before.efficiency_pct, after.efficiency_pct),
        temperature_c: lerp(before.temperature_c, after.temperature_c),
        irradiance_w_m2: lerp(before.irradiance_w_m2, after.irradiance_w_m2),
        inverter_status: before.inverter_status,
        grid_frequency_hz: lerp(before.grid_frequency_hz, after.grid_frequency_hz),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(plant: &str, date: &str) -> RawReading {
        RawReading {
            plant_id: plant.to_string(),
            date: date.to_string(),
            power_output_kwh: 450.0,
            efficiency_pct: 18.5,
            temperature_c: 35.0,
            irradiance_w_m2: 800.0,
            inverter_status: "active".to_string(),
            grid_frequency_hz: 50.0,
        }
    }

    fn validator() -> Validator {
        Validator::default().with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
    }

    fn reading(date: &str, power: f64) -> Reading {
        let mut r = validator().validate(&raw("PLANT_001", date)).unwrap();
        r.power_output_kwh = power;
        r
    }

    #[test]
    fn test_valid_reading_passes() {
        let r = validator().validate(&raw("PLANT_001", "2025-01-01")).unwrap();
        assert_eq!(r.inverter_status, InverterStatus::Active);
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_all_violations_are_collected() {
        let mut bad = raw("  ", "2025-01-01");
        bad.power_output_kwh = -5.0;
        bad.efficiency_pct = 120.0;
        bad.irradiance_w_m2 = 1600.0;
        bad.grid_frequency_hz = 51.0;
        let err = validator().validate(&bad).unwrap_err();
        assert_eq!(err.violations.len(), 5, "got {:?}", err.violations);
        assert_eq!(err.violations[0], Violation::EmptyPlantId);
        assert!(err.to_string().contains("; "), "violations joined with '; '");
    }

    #[test]
    fn test_future_and_invalid_dates_rejected() {
        let err = validator().validate(&raw("P", "2025-07-01")).unwrap_err();
        assert!(matches!(err.violations[0], Violation::FutureDate(_)));

        let err = validator().validate(&raw("P", "2025-02-30")).unwrap_err();
        assert!(matches!(err.violations[0], Violation::InvalidDate(_)));
    }

    #[test]
    fn test_unpinned_reference_date_follows_clock() {
        let v = Validator::default();
        let today = Utc::now().date_naive();
        assert_eq!(v.reference_date(), today, "resolved at check time, not construction");
        assert!(v.validate(&raw("PLANT_001", &today.to_string())).is_ok());

        let tomorrow = today + chrono::Duration::days(1);
        let err = v.validate(&raw("PLANT_001", &tomorrow.to_string())).unwrap_err();
        assert!(err.violations.contains(&Violation::FutureDate(tomorrow)));

        let pinned = v.with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
        assert_eq!(pinned.reference_date().to_string(), "2025-06-30");
    }

    #[test]
    fn test_status_case_insensitive_and_unknown_rejected() {
        let mut r = raw("P", "2025-01-01");
        r.inverter_status = "MAINTENANCE".to_string();
        assert!(validator().validate(&r).is_ok());
        r.inverter_status = "OK".to_string();
        let err = validator().validate(&r).unwrap_err();
        assert_eq!(err.violations, vec![Violation::UnknownInverterStatus("OK".to_string())]);
    }

    #[test]
    fn test_temperature_boundaries_inclusive() {
        let mut r = raw("P", "2025-01-01");
        r.temperature_c = -50.0;
        assert!(validator().validate(&r).is_ok());
        r.temperature_c = 80.0;
        assert!(validator().validate(&r).is_ok());
        r.temperature_c = 80.1;
        assert!(validator().validate(&r).is_err());
    }

    #[test]
    fn test_batch_pass_count_matches_individual() {
        let mut bad = raw("P", "2025-01-02");
        bad.efficiency_pct = -1.0;
        let batch = vec![raw("P", "2025-01-01"), bad, raw("P", "not-a-date")];
        let v = validator();
        let results = v.validate_batch(&batch);
        assert_eq!(results.len(), 3);
        let passed = results.iter().filter(|r| r.is_ok()).count();
        let individually = batch.iter().filter(|r| v.validate(r).is_ok()).count();
        assert_eq!(passed, individually);
        assert_eq!(passed, 1);

        let report = v.partition(&batch);
        assert_eq!(report.valid.len(), 1);
        assert_eq!(report.rejected.len(), 2);
        assert!(report.primary_rejection_reason().is_some());
    }

    #[test]
    fn test_convert_unchecked_ignores_ranges() {
        let mut r = raw("P", "2025-01-01");
        r.irradiance_w_m2 = 9999.0;
        assert!(Validator::convert_unchecked(&r).is_ok());
        r.date = "garbage".to_string();
        assert!(Validator::convert_unchecked(&r).is_err());
    }

    #[test]
    fn test_remove_duplicates_keeps_first_and_is_idempotent() {
        let readings = vec![
            reading("2025-01-01", 1.0),
            reading("2025-01-02", 2.0),
            reading("2025-01-01", 3.0),
        ];
        let once = Validator::remove_duplicates(&readings);
        assert_eq!(once.len(), 2);
        assert_eq!(once[0].power_output_kwh, 1.0);
        assert_eq!(once[1].power_output_kwh, 2.0);
        let twice = Validator::remove_duplicates(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remove_duplicates_properties_over_random_batches() {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        use std::collections::HashSet;

        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let plants = ["PLANT_001", "PLANT_002", "PLANT_003"];
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let len = rng.gen_range(0..40);
            // power carries the input position so order is observable
            let readings: Vec<Reading> = (0..len)
                .map(|i| {
                    let date = start + chrono::Duration::days(rng.gen_range(0..10));
                    let mut r = reading(&date.to_string(), f64::from(i));
                    r.plant_id = plants[rng.gen_range(0..plants.len())].to_string();
                    r
                })
                .collect();

            let once = Validator::remove_duplicates(&readings);
            assert!(once.len() <= readings.len(), "seed {seed}: dedup lengthened the batch");
            assert_eq!(Validator::remove_duplicates(&once), once, "seed {seed}: not idempotent");
            assert!(
                once.windows(2).all(|w| w[0].power_output_kwh < w[1].power_output_kwh),
                "seed {seed}: input order not preserved"
            );

            let mut seen = HashSet::new();
            let expected: Vec<&Reading> = readings
                .iter()
                .filter(|r| seen.insert((r.plant_id.clone(), r.date)))
                .collect();
            assert_eq!(once.iter().collect::<Vec<_>>(), expected, "seed {seed}: first occurrence must win");
        }
    }

    #[test]
    fn test_fill_gaps_interpolates_every_numeric_field() {
        let mut late = reading("2025-01-05", 500.0);
        late.grid_frequency_hz = 50.4;
        late.inverter_status = InverterStatus::Fault;
        let readings = vec![late, reading("2025-01-01", 100.0)];
        let filled = Validator::fill_date_gaps(&readings, FillMethod::Interpolate);
        assert_eq!(filled.len(), 5);
        assert_eq!(filled[0].date.to_string(), "2025-01-01");
        assert!((filled[1].power_output_kwh - 200.0).abs() < 1e-9);
        assert!((filled[2].grid_frequency_hz - 50.2).abs() < 1e-9);
        assert_eq!(filled[3].inverter_status, InverterStatus::Active, "categorical from earlier reading");
        assert_eq!(filled[4].power_output_kwh, 500.0);
    }

    #[test]
    fn test_fill_gaps_forward_fill_copies_previous_day() {
        let readings = vec![reading("2025-01-01", 100.0), reading("2025-01-04", 400.0)];
        let filled = Validator::fill_date_gaps(&readings, FillMethod::ForwardFill);
        assert_eq!(filled.len(), 4);
        assert_eq!(filled[1].power_output_kwh, 100.0);
        assert_eq!(filled[2].power_output_kwh, 100.0);
        assert_eq!(filled[2].date.to_string(), "2025-01-03");
    }

    #[test]
    fn test_fill_gaps_single_reading_unchanged() {
        let readings = vec![reading("2025-01-01", 100.0)];
        assert_eq!(Validator::fill_date_gaps(&readings, FillMethod::Interpolate), readings);
    }

    #[test]
    fn test_outliers_zscore_and_iqr() {
        let mut readings: Vec<Reading> = (1..=20)
            .map(|d| reading(&format!("2025-01-{d:02}"), 450.0 + f64::from(d % 3)))
            .collect();
        readings[10].power_output_kwh = 50.0;
        let v = validator();
        let z = v.detect_outliers(&readings, Metric::PowerOutputKwh, OutlierMethod::ZScore, None);
        assert_eq!(z.len(), 1);
        assert_eq!(z[0].power_output_kwh, 50.0);
        let iqr = v.detect_outliers(&readings, Metric::PowerOutputKwh, OutlierMethod::Iqr, None);
        assert_eq!(iqr.len(), 1);
    }

    #[test]
    fn test_outliers_need_three_readings_and_spread() {
        let v = validator();
        let two = vec![reading("2025-01-01", 1.0), reading("2025-01-02", 1000.0)];
        assert!(v.detect_outliers(&two, Metric::PowerOutputKwh, OutlierMethod::ZScore, None).is_empty());
        let flat: Vec<Reading> = (1..=5).map(|d| reading(&format!("2025-01-0{d}"), 7.0)).collect();
        assert!(v.detect_outliers(&flat, Metric::PowerOutputKwh, OutlierMethod::ZScore, None).is_empty());
    }
}
