//! Statistical reference for one plant / metric / period.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Metric;

/// Inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Smallest range covering every date yielded, or `None` when empty.
    pub fn spanning<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        dates.into_iter().fold(None, |acc, date| match acc {
            None => Some(Self { start: date, end: date }),
            Some(r) => Some(Self {
                start: r.start.min(date),
                end: r.end.max(date),
            }),
        })
    }

    /// Number of days from start to end (0 for a single-day range).
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Baseline statistics computed fresh for each (plant, metric, period).
///
/// Never mutated; a refresh replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub plant_id: String,
    #[serde(rename = "metric_name")]
    pub metric: Metric,
    /// e.g. `Q1_2025`
    pub period_name: String,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub q1: f64,
    /// Median
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
    pub min_val: f64,
    pub max_val: f64,
    pub samples_count: usize,
    pub date_range: DateRange,
    pub calculated_at: DateTime<Utc>,
}
