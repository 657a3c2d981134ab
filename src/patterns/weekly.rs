//! Day-of-week cycle.

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};

use super::seasonal::extremes;
use super::{GroupDeviation, PatternDraft, PatternError, Series};
use crate::config::PatternConfig;
use crate::stats;
use crate::types::{PatternFrequency, PatternType};

pub(super) fn detect(series: &Series, config: &PatternConfig) -> Result<Option<PatternDraft>, PatternError> {
    if series.len() < config.weekly_min_readings {
        return Ok(None);
    }

    let mut by_day: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for (date, value) in series.points() {
        by_day.entry(date.weekday().num_days_from_monday()).or_default().push(value);
    }
    if by_day.len() < 7 {
        return Ok(None);
    }

    let daily: Vec<(u32, f64)> = by_day.iter().map(|(d, v)| (*d, stats::mean(v))).collect();
    let means: Vec<f64> = daily.iter().map(|(_, m)| *m).collect();
    let spread = GroupDeviation::of(&means, PatternType::WeeklyCycle, series.metric)?;

    if spread.average <= config.weekly_threshold_pct {
        return Ok(None);
    }

    let (peak, trough) = extremes(&daily);
    let description = format!(
        "Weekly cycle: Higher on {}s, lower on {}s (±{:.1}%)",
        day_name(peak.0),
        day_name(trough.0),
        spread.average
    );

    let weeks = series.span_days() as f64 / 7.0;
    Ok(Some(PatternDraft {
        pattern_type: PatternType::WeeklyCycle,
        description,
        frequency: PatternFrequency::Weekly,
        amplitude: Some(peak.1 - trough.1),
        significance_score: (spread.average * 3.0).min(100.0),
        confidence_pct: (60.0 + spread.average * 2.0).min(100.0),
        occurrence_count: ((weeks / 4.0).floor() as u32).max(4),
    }))
}

fn day_name(days_from_monday: u32) -> &'static str {
    match Weekday::try_from(u8::try_from(days_from_monday).unwrap_or(u8::MAX)) {
        Ok(Weekday::Mon) => "Monday",
        Ok(Weekday::Tue) => "Tuesday",
        Ok(Weekday::Wed) => "Wednesday",
        Ok(Weekday::Thu) => "Thursday",
        Ok(Weekday::Fri) => "Friday",
        Ok(Weekday::Sat) => "Saturday",
        Ok(Weekday::Sun) => "Sunday",
        Err(_) => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::daily_series;
    use super::*;
    use crate::types::Metric;

    fn weekend_dip(days: usize, weekend: f64) -> Series {
        let readings = daily_series(days, |_, d| match d.weekday() {
            Weekday::Sat | Weekday::Sun => weekend,
            _ => 1000.0,
        });
        Series::from_readings(&readings, Metric::PowerOutputKwh)
    }

    #[test]
    fn test_weekend_dip_detected() {
        let draft = detect(&weekend_dip(120, 700.0), &PatternConfig::default())
            .unwrap()
            .expect("30% weekend dip is a weekly cycle");
        assert_eq!(draft.frequency, PatternFrequency::Weekly);
        // Ties keep the earliest day of the week
        assert!(draft.description.starts_with("Weekly cycle: Higher on Mondays, lower on Saturdays"));
        assert_eq!(draft.amplitude, Some(300.0));
        // avg deviation ≈ 13.4%
        assert!((draft.significance_score - 40.3).abs() < 0.5);
        assert!((draft.confidence_pct - 86.9).abs() < 0.5);
        // 119 days span = 17 weeks → floor(4.25) = 4
        assert_eq!(draft.occurrence_count, 4);
    }

    #[test]
    fn test_small_dip_ignored() {
        assert!(detect(&weekend_dip(120, 950.0), &PatternConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_needs_sixty_readings() {
        assert!(detect(&weekend_dip(59, 500.0), &PatternConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_day_names() {
        assert_eq!(day_name(0), "Monday");
        assert_eq!(day_name(6), "Sunday");
        assert_eq!(day_name(7), "Unknown");
    }
}
