//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::AnalyticsConfig;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `AnalyticsConfig`.
///
/// Maintained by hand alongside analytics_config.rs. Any new field added
/// there must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [validation]
        "validation",
        "validation.min_grid_frequency_hz",
        "validation.max_grid_frequency_hz",
        "validation.min_temperature_c",
        "validation.max_temperature_c",
        "validation.max_irradiance_w_m2",
        "validation.max_efficiency_pct",
        "validation.outlier_zscore_threshold",
        // [baseline]
        "baseline",
        "baseline.min_samples",
        // [anomaly]
        "anomaly",
        "anomaly.zscore_threshold",
        "anomaly.iqr_multiplier",
        "anomaly.severity_medium_pct",
        "anomaly.severity_high_pct",
        "anomaly.severity_critical_pct",
        // [patterns]
        "patterns",
        "patterns.min_readings",
        "patterns.seasonal_min_readings",
        "patterns.seasonal_threshold_pct",
        "patterns.weekly_min_readings",
        "patterns.weekly_threshold_pct",
        "patterns.degradation_min_readings",
        "patterns.degradation_threshold_pct_per_year",
        "patterns.fleet_min_plants",
        // [insights]
        "insights",
        "insights.zscore_confidence_factor",
        "insights.urgency_critical_score",
        "insights.urgency_high_score",
        "insights.urgency_medium_score",
        // [health]
        "health",
        "health.frequency_weight",
        "health.severity_weight",
        "health.trend_weight",
        "health.max_anomaly_rate",
        "health.excellent_score",
        "health.good_score",
        "health.fair_score",
        "health.poor_score",
        // [pipeline]
        "pipeline",
        "pipeline.metrics",
        "pipeline.validate",
        "pipeline.fill_gaps",
        "pipeline.fill_method",
        "pipeline.detect_patterns",
        "pipeline.generate_insights",
        "pipeline.score_health",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Edit distance between two strings, counted in chars.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        // Tie-break on the key itself so suggestions are stable across runs
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Never fails on unknown keys; existing configs always continue to load.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new(); // parse errors are reported by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| {
            let suggestion = suggest_correction(&key, &known);
            ValidationWarning {
                message: format!("Unknown config key '{key}'"),
                field: key,
                suggestion,
            }
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed config.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent a run; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(config: &AnalyticsConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let v = &config.validation;

    // Irradiance at ground level never approaches 2000 W/m², even with cloud-edge enhancement
    if v.max_irradiance_w_m2 > 2000.0 {
        errors.push(format!(
            "validation.max_irradiance_w_m2 = {:.0} is outside physical range (0-2000 W/m²)",
            v.max_irradiance_w_m2
        ));
    }

    // Panel temperature: anything outside -100..150 °C is a unit mistake
    if v.min_temperature_c < -100.0 || v.max_temperature_c > 150.0 {
        errors.push(format!(
            "validation.temperature_c band ({:.0} to {:.0}) is outside physical range (-100 to 150 °C)",
            v.min_temperature_c, v.max_temperature_c
        ));
    }

    // Grid frequency band should contain a nominal 50 or 60 Hz
    let contains_nominal = [50.0, 60.0]
        .iter()
        .any(|hz| (v.min_grid_frequency_hz..=v.max_grid_frequency_hz).contains(hz));
    if !contains_nominal {
        warnings.push(ValidationWarning {
            field: "validation.grid_frequency_hz".to_string(),
            message: format!(
                "grid frequency band {:.2}-{:.2} Hz excludes both 50 Hz and 60 Hz nominal",
                v.min_grid_frequency_hz, v.max_grid_frequency_hz
            ),
            suggestion: None,
        });
    }

    if config.anomaly.zscore_threshold < 1.0 {
        warnings.push(ValidationWarning {
            field: "anomaly.zscore_threshold".to_string(),
            message: format!(
                "anomaly.zscore_threshold = {:.2} will flag a large share of ordinary readings",
                config.anomaly.zscore_threshold
            ),
            suggestion: None,
        });
    }

    let p = &config.patterns;
    if p.seasonal_min_readings < 365 {
        warnings.push(ValidationWarning {
            field: "patterns.seasonal_min_readings".to_string(),
            message: format!(
                "patterns.seasonal_min_readings = {} is less than a year of daily readings",
                p.seasonal_min_readings
            ),
            suggestion: None,
        });
    }
    if p.degradation_min_readings < 365 {
        warnings.push(ValidationWarning {
            field: "patterns.degradation_min_readings".to_string(),
            message: format!(
                "patterns.degradation_min_readings = {} will confuse seasonal swings with degradation",
                p.degradation_min_readings
            ),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("baseline", "baseline"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("treshold", "threshold"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [anomaly]
            zscore_threshold = 2.5
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"anomaly".to_string()));
        assert!(keys.contains(&"anomaly.zscore_threshold".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[anomaly]
zscore_treshold = 2.5
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "anomaly.zscore_treshold");
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("anomaly.zscore_threshold")
        );
        assert!(warnings[0].to_string().contains("did you mean"));
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
[baseline]
min_samples = 20

[patterns]
fleet_min_plants = 3

[pipeline]
metrics = ["efficiency_pct"]
fill_method = "interpolate"
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_defaults_have_no_range_findings() {
        let (errors, warnings) = validate_physical_ranges(&AnalyticsConfig::default());
        assert!(errors.is_empty(), "{errors:?}");
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn test_irradiance_above_physical_limit_is_error() {
        let mut config = AnalyticsConfig::default();
        config.validation.max_irradiance_w_m2 = 5000.0;
        let (errors, _) = validate_physical_ranges(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("max_irradiance_w_m2"));
    }

    #[test]
    fn test_off_nominal_frequency_band_warns() {
        let mut config = AnalyticsConfig::default();
        config.validation.min_grid_frequency_hz = 51.0;
        config.validation.max_grid_frequency_hz = 52.0;
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
