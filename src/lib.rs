//! Solar Insights: analytics for fleets of solar plants
//!
//! Turns daily plant telemetry into baselines, anomalies, recurring patterns,
//! explained insights and health scores.
//!
//! ## Architecture
//!
//! - **Validator**: business-rule checks, deduplication, gap filling, outliers
//! - **BaselineCalculator**: per plant/metric statistical reference
//! - **AnomalyDetector**: z-score then IQR screening against a baseline
//! - **PatternDetector**: seasonal, weekly and degradation patterns
//! - **InsightsEngine**: human-readable findings from anomalies and patterns
//! - **HealthScorer**: weighted 0-100 plant health
//! - **Pipeline**: runs all of the above per plant and metric, isolating failures

pub mod anomaly;
pub mod baseline;
pub mod config;
pub mod health;
pub mod ids;
pub mod insights;
pub mod patterns;
pub mod pipeline;
pub mod stats;
pub mod types;
pub mod validator;

// Re-export configuration
pub use config::AnalyticsConfig;

// Re-export commonly used types
pub use types::{
    Anomaly, Baseline, HealthScore, HealthStatus, Insight, Metric, Pattern, PatternType, Plant,
    RawReading, Reading, Severity, Urgency,
};

// Re-export components
pub use anomaly::AnomalyDetector;
pub use baseline::{BaselineCalculator, BaselineError, BaselineOutcome};
pub use health::HealthScorer;
pub use ids::{IdSource, RandomIds, SequentialIds, SharedIds};
pub use insights::InsightsEngine;
pub use patterns::{PatternDetector, PatternError};
pub use pipeline::{Pipeline, PipelineResult, RunOptions};
pub use validator::{FillMethod, OutlierMethod, ValidationError, Validator};
