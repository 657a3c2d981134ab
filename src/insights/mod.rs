//! Insights Engine - explained findings from anomalies and patterns
//!
//! Turns the raw outputs of the detectors into human-readable insights,
//! each with a title, reasoning, business impact, confidence and urgency.
//!
//! ## Architecture
//!
//! Three independent passes, concatenated in order:
//!
//! 1. **Anomaly insights**: one per anomaly, urgency mapped from severity
//! 2. **Pattern insights**: one per pattern, urgency from significance
//! 3. **Combined insights**: for every anomaly, one per pattern on the same
//!    metric, scored from both sides
//!
//! Nothing is deduplicated or ranked; the combined pass grows with
//! anomalies × matching patterns.
//!
//! ## Usage
//!
//! ```ignore
//! let engine = InsightsEngine::new(&config.insights, ids, Utc::now().date_naive());
//! let insights = engine.generate_insights(&readings, &anomalies, &patterns);
//! ```

use chrono::NaiveDate;
use tracing::info;

use crate::config::InsightConfig;
use crate::ids::SharedIds;
use crate::stats;
use crate::types::{
    Anomaly, DateRange, Insight, InsightType, Pattern, PatternType, Reading, Severity, Urgency,
};

pub struct InsightsEngine {
    config: InsightConfig,
    ids: SharedIds,
    generation_date: NaiveDate,
}

impl InsightsEngine {
    pub fn new(config: &InsightConfig, ids: SharedIds, generation_date: NaiveDate) -> Self {
        Self {
            config: config.clone(),
            ids,
            generation_date,
        }
    }

    pub fn generate_insights(
        &self,
        readings: &[Reading],
        anomalies: &[Anomaly],
        patterns: &[Pattern],
    ) -> Vec<Insight> {
        let range = DateRange::spanning(readings.iter().map(|r| r.date));

        let mut insights: Vec<Insight> = anomalies
            .iter()
            .map(|a| self.anomaly_insight(a, range))
            .collect();
        let from_anomalies = insights.len();

        insights.extend(patterns.iter().map(|p| self.pattern_insight(p, range)));
        let from_patterns = insights.len() - from_anomalies;

        for anomaly in anomalies {
            let related: Vec<&Pattern> = patterns.iter().filter(|p| p.metric == anomaly.metric).collect();
            if related.is_empty() {
                continue;
            }
            let pattern_confidence =
                stats::mean(&related.iter().map(|p| p.confidence_pct).collect::<Vec<_>>());
            let combined = ((self.anomaly_confidence(anomaly) + pattern_confidence) / 2.0).min(100.0);
            insights.extend(
                related
                    .iter()
                    .map(|p| self.combined_insight(anomaly, p, related.len(), combined, range)),
            );
        }

        info!(
            anomaly_insights = from_anomalies,
            pattern_insights = from_patterns,
            combined_insights = insights.len() - from_anomalies - from_patterns,
            "Insights generated"
        );
        insights
    }

    /// min(100, |z|·factor) for z-score detections, min(100, |deviation %|) otherwise.
    pub fn anomaly_confidence(&self, anomaly: &Anomaly) -> f64 {
        match anomaly.z_score() {
            Some(z) => (z.abs() * self.config.zscore_confidence_factor).min(100.0),
            None => anomaly.deviation_pct.abs().min(100.0),
        }
    }

    pub fn urgency_for_score(&self, score: f64) -> Urgency {
        if score >= self.config.urgency_critical_score {
            Urgency::Critical
        } else if score >= self.config.urgency_high_score {
            Urgency::High
        } else if score >= self.config.urgency_medium_score {
            Urgency::Medium
        } else {
            Urgency::Low
        }
    }

    fn next_id(&self) -> String {
        format!("ins-{}", self.ids.next_suffix())
    }

    fn anomaly_insight(&self, anomaly: &Anomaly, range: Option<DateRange>) -> Insight {
        let metric = anomaly.metric;
        let recommended_action = (anomaly.severity == Severity::Critical).then(|| {
            format!(
                "Inspect {} on {}: {metric} deviated {:.1}% from baseline",
                anomaly.plant_id, anomaly.date, anomaly.deviation_pct
            )
        });
        Insight {
            insight_id: self.next_id(),
            plant_id: anomaly.plant_id.clone(),
            insight_type: InsightType::AnomalyCauseHypothesis,
            title: format!("Anomaly Detected: {metric}"),
            description: format!(
                "Unexpected {metric} value detected. Actual: {:.2}, Expected: {:.2}, Deviation: {:.1}%",
                anomaly.actual_value, anomaly.expected_value, anomaly.deviation_pct
            ),
            reasoning: format!(
                "Detected by {} method with {} severity",
                anomaly.detection.method(),
                anomaly.severity
            ),
            business_impact: format!("Potential performance issue affecting {metric}"),
            confidence: self.anomaly_confidence(anomaly),
            recommended_action,
            urgency: Urgency::from(anomaly.severity),
            linked_anomalies: vec![anomaly.anomaly_id.clone()],
            linked_patterns: Vec::new(),
            generation_date: self.generation_date,
            applicable_date_range: range,
        }
    }

    fn pattern_insight(&self, pattern: &Pattern, range: Option<DateRange>) -> Insight {
        let metric = pattern.metric;
        let (insight_type, title) = match pattern.pattern_type {
            PatternType::Degradation => (InsightType::PerformanceTrend, format!("Performance Degradation: {metric}")),
            PatternType::Seasonal => (InsightType::PatternExplanation, format!("Seasonal Pattern: {metric}")),
            PatternType::WeeklyCycle => (InsightType::PatternExplanation, format!("Operational Pattern: {metric}")),
        };

        let mut description = pattern.description.clone();
        if pattern.is_fleet_wide {
            description.push_str(" (Fleet-wide pattern)");
        }
        description.push_str(&format!(". Confidence: {:.1}%", pattern.confidence_pct));

        let (business_impact, recommended_action) = match pattern.pattern_type {
            PatternType::Degradation => (
                format!("{}. Maintenance may be required.", pattern.description),
                Some(if pattern.is_fleet_wide {
                    format!(
                        "Review {metric} degradation across {} plants; check for a common equipment cause",
                        pattern.affected_plants.len()
                    )
                } else {
                    format!("Schedule inspection and cleaning of {} to address {metric} decline", pattern.plant_id)
                }),
            ),
            other => (format!("Expected {other} in {metric}"), None),
        };

        Insight {
            insight_id: self.next_id(),
            plant_id: pattern.plant_id.clone(),
            insight_type,
            title,
            description,
            reasoning: format!(
                "Pattern detected with {} occurrences. Significance score: {:.1}%, Confidence: {:.1}%",
                pattern.occurrence_count, pattern.significance_score, pattern.confidence_pct
            ),
            business_impact,
            confidence: pattern.confidence_pct,
            recommended_action,
            urgency: self.urgency_for_score(pattern.significance_score),
            linked_anomalies: Vec::new(),
            linked_patterns: vec![pattern.pattern_id.clone()],
            generation_date: self.generation_date,
            applicable_date_range: range,
        }
    }

    fn combined_insight(
        &self,
        anomaly: &Anomaly,
        pattern: &Pattern,
        related_count: usize,
        confidence: f64,
        range: Option<DateRange>,
    ) -> Insight {
        Insight {
            insight_id: self.next_id(),
            plant_id: anomaly.plant_id.clone(),
            insight_type: InsightType::PerformanceTrend,
            title: format!("Anomaly in Context of Pattern: {}", anomaly.metric),
            description: format!(
                "Anomaly on {} detected within a known pattern context. Pattern: {}",
                anomaly.date, pattern.description
            ),
            reasoning: format!("Correlation found between anomaly and {related_count} pattern(s)"),
            business_impact: "Anomaly correlates with known pattern".to_string(),
            confidence,
            recommended_action: None,
            urgency: self.urgency_for_score(confidence),
            linked_anomalies: vec![anomaly.anomaly_id.clone()],
            linked_patterns: vec![pattern.pattern_id.clone()],
            generation_date: self.generation_date,
            applicable_date_range: range,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
