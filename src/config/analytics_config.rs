//! Analytics Configuration - every analysis threshold as an operator-tunable TOML value
//!
//! Each section struct implements `Default` with the constants from
//! [`super::defaults`], so a run with no config file behaves identically to
//! one with an empty file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::types::Metric;
use crate::validator::FillMethod;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an analytics run.
///
/// Load with `AnalyticsConfig::load()` which searches:
/// 1. `$SOLAR_INSIGHTS_CONFIG` env var
/// 2. `./solar_insights.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Business-rule ranges for incoming readings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Baseline sample requirements
    #[serde(default)]
    pub baseline: BaselineConfig,

    /// Z-score / IQR detection and severity tiers
    #[serde(default)]
    pub anomaly: AnomalyConfig,

    /// Seasonal, weekly and degradation detection
    #[serde(default)]
    pub patterns: PatternConfig,

    /// Insight confidence and urgency tiers
    #[serde(default)]
    pub insights: InsightConfig,

    /// Plant health score weights and status tiers
    #[serde(default)]
    pub health: HealthConfig,

    /// Which stages a run performs
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl AnalyticsConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SOLAR_INSIGHTS_CONFIG` environment variable
    /// 2. `./solar_insights.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded analytics config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded analytics config from ./{}", defaults::LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", defaults::LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys only warn; semantic problems fail with every error listed.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Write the config out, e.g. to seed an editable file from defaults.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Analytics config saved");
        Ok(())
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Lower range bounds must be below upper bounds
    /// - Multipliers and thresholds must be positive
    /// - Tiered cut-offs must ascend
    /// - Health weights must sum to approximately 1.0
    /// - `baseline.min_samples` may not drop below 13
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        // Reject NaN/Inf before any ordering checks (comparisons silently pass)
        for (name, value) in self.numeric_fields() {
            if !value.is_finite() {
                errors.push(format!("{name} must be a finite number (got {value})"));
            }
        }

        let v = &self.validation;
        Self::check_range(v.min_grid_frequency_hz, v.max_grid_frequency_hz, "validation.grid_frequency_hz", &mut errors);
        Self::check_range(v.min_temperature_c, v.max_temperature_c, "validation.temperature_c", &mut errors);
        if v.max_irradiance_w_m2 <= 0.0 {
            errors.push("validation.max_irradiance_w_m2 must be > 0".to_string());
        }
        if v.max_efficiency_pct <= 0.0 || v.max_efficiency_pct > 100.0 {
            errors.push(format!(
                "validation.max_efficiency_pct ({:.1}) must be within (0, 100]",
                v.max_efficiency_pct
            ));
        }
        if v.outlier_zscore_threshold <= 0.0 {
            errors.push("validation.outlier_zscore_threshold must be > 0".to_string());
        }

        if self.baseline.min_samples < defaults::MIN_BASELINE_SAMPLES {
            errors.push(format!(
                "baseline.min_samples ({}) must be >= {}",
                self.baseline.min_samples,
                defaults::MIN_BASELINE_SAMPLES
            ));
        }

        let a = &self.anomaly;
        if a.zscore_threshold <= 0.0 {
            errors.push("anomaly.zscore_threshold must be > 0".to_string());
        }
        if a.iqr_multiplier <= 0.0 {
            errors.push("anomaly.iqr_multiplier must be > 0".to_string());
        }
        Self::check_tiers(
            &[a.severity_medium_pct, a.severity_high_pct, a.severity_critical_pct],
            "anomaly.severity (medium < high < critical)",
            &mut errors,
        );

        let p = &self.patterns;
        if p.min_readings == 0 {
            errors.push("patterns.min_readings must be > 0".to_string());
        }
        if p.seasonal_threshold_pct <= 0.0 {
            errors.push("patterns.seasonal_threshold_pct must be > 0".to_string());
        }
        if p.weekly_threshold_pct <= 0.0 {
            errors.push("patterns.weekly_threshold_pct must be > 0".to_string());
        }
        if p.degradation_threshold_pct_per_year <= 0.0 {
            errors.push("patterns.degradation_threshold_pct_per_year must be > 0".to_string());
        }
        if p.fleet_min_plants < 2 {
            errors.push(format!(
                "patterns.fleet_min_plants ({}) must be >= 2",
                p.fleet_min_plants
            ));
        }

        let i = &self.insights;
        if i.zscore_confidence_factor <= 0.0 {
            errors.push("insights.zscore_confidence_factor must be > 0".to_string());
        }
        Self::check_tiers(
            &[i.urgency_medium_score, i.urgency_high_score, i.urgency_critical_score],
            "insights.urgency (medium < high < critical)",
            &mut errors,
        );

        let h = &self.health;
        if h.frequency_weight < 0.0 || h.severity_weight < 0.0 || h.trend_weight < 0.0 {
            errors.push("health weights must be >= 0".to_string());
        }
        let weight_sum = h.frequency_weight + h.severity_weight + h.trend_weight;
        if !(0.99..=1.01).contains(&weight_sum) {
            errors.push(format!("health weights must sum to ~1.0, got {weight_sum:.2}"));
        }
        if h.max_anomaly_rate <= 0.0 || h.max_anomaly_rate > 1.0 {
            errors.push(format!(
                "health.max_anomaly_rate ({:.2}) must be within (0, 1]",
                h.max_anomaly_rate
            ));
        }
        Self::check_tiers(
            &[h.poor_score, h.fair_score, h.good_score, h.excellent_score],
            "health status (poor < fair < good < excellent)",
            &mut errors,
        );

        if self.pipeline.metrics.is_empty() {
            errors.push("pipeline.metrics must name at least one metric".to_string());
        }
        for name in &self.pipeline.metrics {
            if name.parse::<Metric>().is_err() {
                errors.push(format!("pipeline.metrics: unknown metric '{name}'"));
            }
        }

        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn numeric_fields(&self) -> Vec<(&'static str, f64)> {
        let v = &self.validation;
        let a = &self.anomaly;
        let p = &self.patterns;
        let i = &self.insights;
        let h = &self.health;
        vec![
            ("validation.min_grid_frequency_hz", v.min_grid_frequency_hz),
            ("validation.max_grid_frequency_hz", v.max_grid_frequency_hz),
            ("validation.min_temperature_c", v.min_temperature_c),
            ("validation.max_temperature_c", v.max_temperature_c),
            ("validation.max_irradiance_w_m2", v.max_irradiance_w_m2),
            ("validation.max_efficiency_pct", v.max_efficiency_pct),
            ("validation.outlier_zscore_threshold", v.outlier_zscore_threshold),
            ("anomaly.zscore_threshold", a.zscore_threshold),
            ("anomaly.iqr_multiplier", a.iqr_multiplier),
            ("anomaly.severity_medium_pct", a.severity_medium_pct),
            ("anomaly.severity_high_pct", a.severity_high_pct),
            ("anomaly.severity_critical_pct", a.severity_critical_pct),
            ("patterns.seasonal_threshold_pct", p.seasonal_threshold_pct),
            ("patterns.weekly_threshold_pct", p.weekly_threshold_pct),
            ("patterns.degradation_threshold_pct_per_year", p.degradation_threshold_pct_per_year),
            ("insights.zscore_confidence_factor", i.zscore_confidence_factor),
            ("insights.urgency_medium_score", i.urgency_medium_score),
            ("insights.urgency_high_score", i.urgency_high_score),
            ("insights.urgency_critical_score", i.urgency_critical_score),
            ("health.frequency_weight", h.frequency_weight),
            ("health.severity_weight", h.severity_weight),
            ("health.trend_weight", h.trend_weight),
            ("health.max_anomaly_rate", h.max_anomaly_rate),
            ("health.excellent_score", h.excellent_score),
            ("health.good_score", h.good_score),
            ("health.fair_score", h.fair_score),
            ("health.poor_score", h.poor_score),
        ]
    }

    fn check_range(min: f64, max: f64, name: &str, errors: &mut Vec<String>) {
        if min >= max {
            errors.push(format!("{name}: min ({min:.2}) must be < max ({max:.2})"));
        }
    }

    fn check_tiers(tiers: &[f64], name: &str, errors: &mut Vec<String>) {
        if tiers.windows(2).any(|w| w[0] >= w[1]) {
            errors.push(format!("{name}: cut-offs must strictly ascend, got {tiers:?}"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            Self::Parse(path, e) => write!(f, "Config parse error ({}): {}", path.display(), e),
            Self::Serialize(e) => write!(f, "Config serialization error: {e}"),
            Self::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {e}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Ranges
// ============================================================================

/// Business-rule bounds applied to every incoming reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_min_grid_frequency")]
    pub min_grid_frequency_hz: f64,
    #[serde(default = "default_max_grid_frequency")]
    pub max_grid_frequency_hz: f64,

    #[serde(default = "default_min_temperature")]
    pub min_temperature_c: f64,
    #[serde(default = "default_max_temperature")]
    pub max_temperature_c: f64,

    #[serde(default = "default_max_irradiance")]
    pub max_irradiance_w_m2: f64,

    #[serde(default = "default_max_efficiency")]
    pub max_efficiency_pct: f64,

    /// |z| cut-off used by `detect_outliers` when the caller passes none
    #[serde(default = "default_outlier_zscore")]
    pub outlier_zscore_threshold: f64,
}

fn default_min_grid_frequency() -> f64 { defaults::MIN_GRID_FREQUENCY_HZ }
fn default_max_grid_frequency() -> f64 { defaults::MAX_GRID_FREQUENCY_HZ }
fn default_min_temperature() -> f64 { defaults::MIN_TEMPERATURE_C }
fn default_max_temperature() -> f64 { defaults::MAX_TEMPERATURE_C }
fn default_max_irradiance() -> f64 { defaults::MAX_IRRADIANCE_W_M2 }
fn default_max_efficiency() -> f64 { defaults::MAX_EFFICIENCY_PCT }
fn default_outlier_zscore() -> f64 { defaults::OUTLIER_ZSCORE_THRESHOLD }

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_grid_frequency_hz: default_min_grid_frequency(),
            max_grid_frequency_hz: default_max_grid_frequency(),
            min_temperature_c: default_min_temperature(),
            max_temperature_c: default_max_temperature(),
            max_irradiance_w_m2: default_max_irradiance(),
            max_efficiency_pct: default_max_efficiency(),
            outlier_zscore_threshold: default_outlier_zscore(),
        }
    }
}

// ============================================================================
// Baseline
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// Minimum readings before a baseline is computed (>= 13)
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
}

fn default_min_samples() -> usize { defaults::MIN_BASELINE_SAMPLES }

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            min_samples: default_min_samples(),
        }
    }
}

// ============================================================================
// Anomaly Detection
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyConfig {
    /// |z| above this flags a reading before the IQR test is tried
    #[serde(default = "default_zscore_threshold")]
    pub zscore_threshold: f64,

    /// Fence = [q1 - m·iqr, q3 + m·iqr]
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,

    /// |deviation %| at which severity becomes medium
    #[serde(default = "default_severity_medium")]
    pub severity_medium_pct: f64,

    /// |deviation %| at which severity becomes high
    #[serde(default = "default_severity_high")]
    pub severity_high_pct: f64,

    /// |deviation %| at which severity becomes critical
    #[serde(default = "default_severity_critical")]
    pub severity_critical_pct: f64,
}

fn default_zscore_threshold() -> f64 { defaults::ANOMALY_ZSCORE_THRESHOLD }
fn default_iqr_multiplier() -> f64 { defaults::ANOMALY_IQR_MULTIPLIER }
fn default_severity_medium() -> f64 { defaults::SEVERITY_MEDIUM_PCT }
fn default_severity_high() -> f64 { defaults::SEVERITY_HIGH_PCT }
fn default_severity_critical() -> f64 { defaults::SEVERITY_CRITICAL_PCT }

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            zscore_threshold: default_zscore_threshold(),
            iqr_multiplier: default_iqr_multiplier(),
            severity_medium_pct: default_severity_medium(),
            severity_high_pct: default_severity_high(),
            severity_critical_pct: default_severity_critical(),
        }
    }
}

// ============================================================================
// Pattern Detection
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// No detection at all below this many readings
    #[serde(default = "default_pattern_min_readings")]
    pub min_readings: usize,

    #[serde(default = "default_seasonal_min_readings")]
    pub seasonal_min_readings: usize,
    /// Mean |monthly deviation| (%) that counts as seasonal
    #[serde(default = "default_seasonal_threshold")]
    pub seasonal_threshold_pct: f64,

    #[serde(default = "default_weekly_min_readings")]
    pub weekly_min_readings: usize,
    /// Mean |weekday deviation| (%) that counts as a weekly cycle
    #[serde(default = "default_weekly_threshold")]
    pub weekly_threshold_pct: f64,

    #[serde(default = "default_degradation_min_readings")]
    pub degradation_min_readings: usize,
    /// Annual decline as % of mean that counts as degradation
    #[serde(default = "default_degradation_threshold")]
    pub degradation_threshold_pct_per_year: f64,

    /// Distinct plants sharing a pattern before it is fleet-wide
    #[serde(default = "default_fleet_min_plants")]
    pub fleet_min_plants: usize,
}

fn default_pattern_min_readings() -> usize { defaults::MIN_PATTERN_READINGS }
fn default_seasonal_min_readings() -> usize { defaults::SEASONAL_MIN_READINGS }
fn default_seasonal_threshold() -> f64 { defaults::SEASONAL_THRESHOLD_PCT }
fn default_weekly_min_readings() -> usize { defaults::WEEKLY_MIN_READINGS }
fn default_weekly_threshold() -> f64 { defaults::WEEKLY_THRESHOLD_PCT }
fn default_degradation_min_readings() -> usize { defaults::DEGRADATION_MIN_READINGS }
fn default_degradation_threshold() -> f64 { defaults::DEGRADATION_THRESHOLD_PCT_PER_YEAR }
fn default_fleet_min_plants() -> usize { defaults::FLEET_MIN_PLANTS }

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_readings: default_pattern_min_readings(),
            seasonal_min_readings: default_seasonal_min_readings(),
            seasonal_threshold_pct: default_seasonal_threshold(),
            weekly_min_readings: default_weekly_min_readings(),
            weekly_threshold_pct: default_weekly_threshold(),
            degradation_min_readings: default_degradation_min_readings(),
            degradation_threshold_pct_per_year: default_degradation_threshold(),
            fleet_min_plants: default_fleet_min_plants(),
        }
    }
}

// ============================================================================
// Insights
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Anomaly confidence = |z| × factor
    #[serde(default = "default_zscore_confidence_factor")]
    pub zscore_confidence_factor: f64,

    #[serde(default = "default_urgency_critical")]
    pub urgency_critical_score: f64,
    #[serde(default = "default_urgency_high")]
    pub urgency_high_score: f64,
    #[serde(default = "default_urgency_medium")]
    pub urgency_medium_score: f64,
}

fn default_zscore_confidence_factor() -> f64 { defaults::ZSCORE_CONFIDENCE_FACTOR }
fn default_urgency_critical() -> f64 { defaults::URGENCY_CRITICAL_SCORE }
fn default_urgency_high() -> f64 { defaults::URGENCY_HIGH_SCORE }
fn default_urgency_medium() -> f64 { defaults::URGENCY_MEDIUM_SCORE }

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            zscore_confidence_factor: default_zscore_confidence_factor(),
            urgency_critical_score: default_urgency_critical(),
            urgency_high_score: default_urgency_high(),
            urgency_medium_score: default_urgency_medium(),
        }
    }
}

// ============================================================================
// Health Scoring
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_frequency_weight")]
    pub frequency_weight: f64,
    #[serde(default = "default_severity_weight")]
    pub severity_weight: f64,
    #[serde(default = "default_trend_weight")]
    pub trend_weight: f64,

    /// Anomalous-day rate that drives the frequency score to zero
    #[serde(default = "default_max_anomaly_rate")]
    pub max_anomaly_rate: f64,

    #[serde(default = "default_excellent_score")]
    pub excellent_score: f64,
    #[serde(default = "default_good_score")]
    pub good_score: f64,
    #[serde(default = "default_fair_score")]
    pub fair_score: f64,
    #[serde(default = "default_poor_score")]
    pub poor_score: f64,
}

fn default_frequency_weight() -> f64 { defaults::HEALTH_FREQUENCY_WEIGHT }
fn default_severity_weight() -> f64 { defaults::HEALTH_SEVERITY_WEIGHT }
fn default_trend_weight() -> f64 { defaults::HEALTH_TREND_WEIGHT }
fn default_max_anomaly_rate() -> f64 { defaults::HEALTH_MAX_ANOMALY_RATE }
fn default_excellent_score() -> f64 { defaults::HEALTH_EXCELLENT_SCORE }
fn default_good_score() -> f64 { defaults::HEALTH_GOOD_SCORE }
fn default_fair_score() -> f64 { defaults::HEALTH_FAIR_SCORE }
fn default_poor_score() -> f64 { defaults::HEALTH_POOR_SCORE }

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            frequency_weight: default_frequency_weight(),
            severity_weight: default_severity_weight(),
            trend_weight: default_trend_weight(),
            max_anomaly_rate: default_max_anomaly_rate(),
            excellent_score: default_excellent_score(),
            good_score: default_good_score(),
            fair_score: default_fair_score(),
            poor_score: default_poor_score(),
        }
    }
}

// ============================================================================
// Pipeline
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Metric names analysed per plant
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,

    /// Apply business-rule validation before analysis
    #[serde(default = "default_true")]
    pub validate: bool,

    /// Fill missing calendar days before analysis
    #[serde(default)]
    pub fill_gaps: bool,

    #[serde(default)]
    pub fill_method: FillMethod,

    #[serde(default = "default_true")]
    pub detect_patterns: bool,

    #[serde(default = "default_true")]
    pub generate_insights: bool,

    #[serde(default = "default_true")]
    pub score_health: bool,
}

fn default_metrics() -> Vec<String> {
    vec![defaults::DEFAULT_METRIC.to_string()]
}
const fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
            validate: true,
            fill_gaps: false,
            fill_method: FillMethod::default(),
            detect_patterns: true,
            generate_insights: true,
            score_health: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AnalyticsConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn test_empty_toml_produces_defaults() {
        let config: AnalyticsConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config.baseline.min_samples, 13);
        assert_eq!(config.anomaly.zscore_threshold, 2.0);
        assert_eq!(config.anomaly.iqr_multiplier, 1.5);
        assert_eq!(config.patterns.seasonal_threshold_pct, 15.0);
        assert_eq!(config.pipeline.metrics, vec!["power_output_kwh".to_string()]);
        assert!(config.pipeline.validate);
        assert!(!config.pipeline.fill_gaps);
    }

    #[test]
    fn test_partial_toml_override() {
        let toml_str = r#"
[anomaly]
zscore_threshold = 3.0

[pipeline]
metrics = ["power_output_kwh", "efficiency_pct"]
fill_gaps = true
fill_method = "forward_fill"
"#;
        let config = AnalyticsConfig::from_toml_str(toml_str).expect("partial TOML should parse");
        assert_eq!(config.anomaly.zscore_threshold, 3.0);
        assert_eq!(config.anomaly.iqr_multiplier, 1.5, "untouched keys keep defaults");
        assert_eq!(config.pipeline.metrics, vec!["power_output_kwh", "efficiency_pct"]);
        assert_eq!(config.pipeline.fill_method, FillMethod::ForwardFill);
    }

    #[test]
    fn test_validation_collects_every_error() {
        let mut config = AnalyticsConfig::default();
        config.baseline.min_samples = 5;
        config.anomaly.severity_high_pct = 60.0;
        config.health.trend_weight = 0.5;
        config.pipeline.metrics = vec!["wind_speed".to_string()];

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 4, "got: {errors:?}");
                assert!(errors.iter().any(|e| e.contains("baseline.min_samples")));
                assert!(errors.iter().any(|e| e.contains("anomaly.severity")));
                assert!(errors.iter().any(|e| e.contains("health weights")));
                assert!(errors.iter().any(|e| e.contains("wind_speed")));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_rejected() {
        let mut config = AnalyticsConfig::default();
        config.anomaly.iqr_multiplier = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("anomaly.iqr_multiplier must be a finite number"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AnalyticsConfig::default();
        let text = config.to_toml().unwrap();
        let back = AnalyticsConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.patterns.fleet_min_plants, config.patterns.fleet_min_plants);
        assert_eq!(back.health.good_score, config.health.good_score);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let err = AnalyticsConfig::load_from_file(Path::new("/nonexistent/solar.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_, _)));
    }
}
