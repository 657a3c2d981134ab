//! Month-of-year variation.

use std::collections::BTreeMap;

use chrono::{Datelike, Month};

use super::{GroupDeviation, PatternDraft, PatternError, Series};
use crate::config::PatternConfig;
use crate::stats;
use crate::types::{PatternFrequency, PatternType};

pub(super) fn detect(series: &Series, config: &PatternConfig) -> Result<Option<PatternDraft>, PatternError> {
    if series.len() < config.seasonal_min_readings {
        return Ok(None);
    }

    let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for (date, value) in series.points() {
        by_month.entry(date.month()).or_default().push(value);
    }
    if by_month.len() < 12 {
        return Ok(None);
    }

    let monthly: Vec<(u32, f64)> = by_month.iter().map(|(m, v)| (*m, stats::mean(v))).collect();
    let means: Vec<f64> = monthly.iter().map(|(_, m)| *m).collect();
    let spread = GroupDeviation::of(&means, PatternType::Seasonal, series.metric)?;

    if spread.average <= config.seasonal_threshold_pct {
        return Ok(None);
    }

    let (peak, trough) = extremes(&monthly);
    let description = format!(
        "Seasonal variation: Higher in {}, lower in {} (±{:.1}%)",
        month_name(peak.0),
        month_name(trough.0),
        spread.average
    );

    Ok(Some(PatternDraft {
        pattern_type: PatternType::Seasonal,
        description,
        frequency: PatternFrequency::Annual,
        amplitude: Some(peak.1 - trough.1),
        significance_score: (spread.average * 2.0).min(100.0),
        confidence_pct: (70.0 + spread.std_dev() * 2.0).min(100.0),
        occurrence_count: (series.years().floor() as u32).max(2),
    }))
}

/// (highest, lowest) group by mean; first wins on ties.
pub(super) fn extremes<K: Copy>(groups: &[(K, f64)]) -> ((K, f64), (K, f64)) {
    let mut peak = groups[0];
    let mut trough = groups[0];
    for &g in &groups[1..] {
        if g.1 > peak.1 {
            peak = g;
        }
        if g.1 < trough.1 {
            trough = g;
        }
    }
    (peak, trough)
}

fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("Unknown", |m| m.name())
}
