//! Long-term decline by least squares on reading position.
//!
//! x is the index of each point in the date-ordered series, not its
//! calendar offset, so a gapped series is fitted as if it were contiguous.

use super::{PatternDraft, PatternError, Series};
use crate::config::PatternConfig;
use crate::stats::{self, LinearFit};
use crate::types::{PatternFrequency, PatternType};

pub(super) fn detect(series: &Series, config: &PatternConfig) -> Result<Option<PatternDraft>, PatternError> {
    if series.len() < config.degradation_min_readings {
        return Ok(None);
    }
    let x: Vec<f64> = (0..series.len()).map(|i| i as f64).collect();
    let Some(fit) = LinearFit::fit(&x, &series.values) else {
        return Ok(None);
    };

    let annual_change = fit.slope * 365.0;
    if annual_change >= 0.0 {
        return Ok(None);
    }

    let mean = stats::mean(&series.values);
    if mean == 0.0 {
        return Err(PatternError::ZeroMean(PatternType::Degradation, series.metric));
    }
    let rate = annual_change.abs() / mean * 100.0;
    if !rate.is_finite() {
        return Err(PatternError::NonFinite(PatternType::Degradation, series.metric));
    }
    if rate <= config.degradation_threshold_pct_per_year {
        return Ok(None);
    }

    let years = series.years();
    Ok(Some(PatternDraft {
        pattern_type: PatternType::Degradation,
        description: format!(
            "Performance degradation: Declining at {rate:.2}% per year (total: {:.1}%)",
            rate * years
        ),
        frequency: PatternFrequency::Annual,
        amplitude: None,
        significance_score: (rate * 10.0).min(100.0),
        confidence_pct: (70.0 + rate * 2.0).min(100.0),
        occurrence_count: (years.floor() as u32).max(2),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::daily_series;
    use super::*;
    use crate::types::Metric;

    fn linear(days: usize, per_day: f64) -> Series {
        let readings = daily_series(days, |i, _| 1000.0 + per_day * i as f64);
        Series::from_readings(&readings, Metric::PowerOutputKwh)
    }

    #[test]
    fn test_steady_decline_detected() {
        // -73 kWh/year against a mean of ~927 → ~7.9 %/year
        let draft = detect(&linear(730, -0.2), &PatternConfig::default())
            .unwrap()
            .expect("7.9%/yr decline is degradation");
        assert_eq!(draft.pattern_type, PatternType::Degradation);
        assert!(draft.amplitude.is_none());
        assert!(draft.description.starts_with("Performance degradation: Declining at 7.8"));
        assert!((draft.significance_score - 78.8).abs() < 0.5);
        assert!((draft.confidence_pct - 85.8).abs() < 0.5);
        assert_eq!(draft.occurrence_count, 2);
    }

    #[test]
    fn test_improvement_is_not_degradation() {
        assert!(detect(&linear(730, 0.2), &PatternConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_slow_decline_below_threshold() {
        // -3.65 kWh/year ≈ 0.37 %/year
        assert!(detect(&linear(730, -0.01), &PatternConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_negative_mean_metric_never_flagged() {
        // Falling further below zero divides by a negative mean
        let readings = daily_series(400, |i, _| -10.0 - 0.02 * i as f64);
        let series = Series::from_readings(&readings, Metric::PowerOutputKwh);
        assert!(
            detect(&series, &PatternConfig::default()).unwrap().is_none(),
            "negative-mean series must not produce a degradation rate"
        );
    }

    #[test]
    fn test_gapped_series_fitted_on_position() {
        // 200 daily points, then 200 points every 5 days; -0.05 per calendar day.
        // Calendar slope gives ~1.9 %/yr, positional slope ~5.6 %/yr.
        let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let offsets: Vec<i64> = (0..400).map(|i| if i < 200 { i } else { 200 + 5 * (i - 200) }).collect();
        let series = Series {
            metric: Metric::PowerOutputKwh,
            dates: offsets.iter().map(|&d| start + chrono::Duration::days(d)).collect(),
            values: offsets.iter().map(|&d| 1000.0 - 0.05 * d as f64).collect(),
        };
        let draft = detect(&series, &PatternConfig::default())
            .unwrap()
            .expect("thinned tail steepens the positional slope");
        assert!(draft.description.starts_with("Performance degradation: Declining at 5."), "{}", draft.description);
        assert!(draft.significance_score > 50.0);
    }

    #[test]
    fn test_needs_a_year_of_points() {
        assert!(detect(&linear(200, -1.0), &PatternConfig::default()).unwrap().is_none());
    }
}
