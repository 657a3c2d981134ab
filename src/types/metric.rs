//! Closed set of analysable reading metrics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Reading;

/// A numeric field of [`Reading`] that baselines, anomalies and patterns
/// can be computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "power_output_kwh")]
    PowerOutputKwh,
    #[serde(rename = "efficiency_pct")]
    EfficiencyPct,
    #[serde(rename = "temperature_c")]
    TemperatureC,
    #[serde(rename = "irradiance_w_m2")]
    IrradianceWm2,
    #[serde(rename = "grid_frequency_hz")]
    GridFrequencyHz,
}

impl Metric {
    pub const ALL: [Self; 5] = [
        Self::PowerOutputKwh,
        Self::EfficiencyPct,
        Self::TemperatureC,
        Self::IrradianceWm2,
        Self::GridFrequencyHz,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PowerOutputKwh => "power_output_kwh",
            Self::EfficiencyPct => "efficiency_pct",
            Self::TemperatureC => "temperature_c",
            Self::IrradianceWm2 => "irradiance_w_m2",
            Self::GridFrequencyHz => "grid_frequency_hz",
        }
    }

    /// Read this metric's value from a reading.
    pub const fn value(self, reading: &Reading) -> f64 {
        match self {
            Self::PowerOutputKwh => reading.power_output_kwh,
            Self::EfficiencyPct => reading.efficiency_pct,
            Self::TemperatureC => reading.temperature_c,
            Self::IrradianceWm2 => reading.irradiance_w_m2,
            Self::GridFrequencyHz => reading.grid_frequency_hz,
        }
    }

    /// Collect this metric's values in reading order.
    pub fn values(self, readings: &[Reading]) -> Vec<f64> {
        readings.iter().map(|r| self.value(r)).collect()
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown metric '{0}'")]
pub struct MetricParseError(pub String);

impl std::str::FromStr for Metric {
    type Err = MetricParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| MetricParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_unknown_metric_rejected() {
        assert!("wind_speed".parse::<Metric>().is_err());
        assert!("Power_Output_kWh".parse::<Metric>().is_err(), "names are exact");
    }

    #[test]
    fn test_serde_uses_column_names() {
        let json = serde_json::to_string(&Metric::IrradianceWm2).unwrap();
        assert_eq!(json, "\"irradiance_w_m2\"");
    }
}
