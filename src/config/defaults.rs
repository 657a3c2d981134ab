//! System-wide default constants.
//!
//! Every tunable in [`super::AnalyticsConfig`] defaults to one of these.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Validation
// ============================================================================

/// Grid frequency band accepted for a 50 Hz grid (Hz).
pub const MIN_GRID_FREQUENCY_HZ: f64 = 49.5;
pub const MAX_GRID_FREQUENCY_HZ: f64 = 50.5;

/// Panel temperature band (°C).
pub const MIN_TEMPERATURE_C: f64 = -50.0;
pub const MAX_TEMPERATURE_C: f64 = 80.0;

/// Upper bound on daily mean irradiance (W/m²).
pub const MAX_IRRADIANCE_W_M2: f64 = 1500.0;

/// Upper bound on conversion efficiency (%).
pub const MAX_EFFICIENCY_PCT: f64 = 100.0;

/// Default |z| cut-off for `Validator::detect_outliers`.
pub const OUTLIER_ZSCORE_THRESHOLD: f64 = 3.0;

/// Fence multiplier for IQR outlier screening.
pub const OUTLIER_IQR_MULTIPLIER: f64 = 1.5;

/// Outlier screening needs at least this many readings.
pub const MIN_READINGS_FOR_OUTLIERS: usize = 3;

// ============================================================================
// Baseline
// ============================================================================

/// Minimum readings for a baseline. Also the floor for the configured value.
pub const MIN_BASELINE_SAMPLES: usize = 13;

// ============================================================================
// Anomaly Detection
// ============================================================================

/// |z| above this flags a reading.
pub const ANOMALY_ZSCORE_THRESHOLD: f64 = 2.0;

/// IQR fence multiplier for anomaly detection.
pub const ANOMALY_IQR_MULTIPLIER: f64 = 1.5;

/// |deviation %| lower bounds for each severity tier (inclusive).
pub const SEVERITY_CRITICAL_PCT: f64 = 50.0;
pub const SEVERITY_HIGH_PCT: f64 = 20.0;
pub const SEVERITY_MEDIUM_PCT: f64 = 10.0;

// ============================================================================
// Pattern Detection
// ============================================================================

/// Below this many readings no pattern detection runs at all.
pub const MIN_PATTERN_READINGS: usize = 30;

/// Seasonal: one year of readings, monthly means deviating > 15 %.
pub const SEASONAL_MIN_READINGS: usize = 365;
pub const SEASONAL_THRESHOLD_PCT: f64 = 15.0;

/// Weekly cycle: ~two months of readings, weekday means deviating > 10 %.
pub const WEEKLY_MIN_READINGS: usize = 60;
pub const WEEKLY_THRESHOLD_PCT: f64 = 10.0;

/// Degradation: one year of readings, decline > 2 % of mean per year.
pub const DEGRADATION_MIN_READINGS: usize = 365;
pub const DEGRADATION_THRESHOLD_PCT_PER_YEAR: f64 = 2.0;

/// Plants that must share a pattern for it to be marked fleet-wide.
pub const FLEET_MIN_PLANTS: usize = 2;

// ============================================================================
// Insights
// ============================================================================

/// Anomaly confidence = |z| × this factor (capped at 100).
pub const ZSCORE_CONFIDENCE_FACTOR: f64 = 15.0;

/// Score lower bounds for urgency tiers (inclusive).
pub const URGENCY_CRITICAL_SCORE: f64 = 85.0;
pub const URGENCY_HIGH_SCORE: f64 = 65.0;
pub const URGENCY_MEDIUM_SCORE: f64 = 45.0;

// ============================================================================
// Health Scoring
// ============================================================================

pub const HEALTH_FREQUENCY_WEIGHT: f64 = 0.5;
pub const HEALTH_SEVERITY_WEIGHT: f64 = 0.3;
pub const HEALTH_TREND_WEIGHT: f64 = 0.2;

/// Anomalous-day rate at which the frequency score bottoms out.
///
/// 0.10 = one anomalous day in ten scores zero.
pub const HEALTH_MAX_ANOMALY_RATE: f64 = 0.10;

/// Overall score lower bounds for each health status (inclusive).
pub const HEALTH_EXCELLENT_SCORE: f64 = 85.0;
pub const HEALTH_GOOD_SCORE: f64 = 70.0;
pub const HEALTH_FAIR_SCORE: f64 = 55.0;
pub const HEALTH_POOR_SCORE: f64 = 40.0;

// ============================================================================
// Pipeline
// ============================================================================

/// Metric analysed when a run does not name any.
pub const DEFAULT_METRIC: &str = "power_output_kwh";

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SOLAR_INSIGHTS_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "solar_insights.toml";
