//! Daily plant readings: the raw ingestion shape and the validated value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calendar-day format used on every ingestion boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Grid frequency assumed when a reading row omits it (Hz).
pub const DEFAULT_GRID_FREQUENCY_HZ: f64 = 50.0;

// ============================================================================
// Inverter Status
// ============================================================================

/// Operating state reported by a plant's inverter for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InverterStatus {
    Active,
    Inactive,
    Fault,
    Standby,
    Maintenance,
}

impl InverterStatus {
    pub const ALL: [Self; 5] = [
        Self::Active,
        Self::Inactive,
        Self::Fault,
        Self::Standby,
        Self::Maintenance,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Fault => "fault",
            Self::Standby => "standby",
            Self::Maintenance => "maintenance",
        }
    }
}

impl std::fmt::Display for InverterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown inverter status '{0}' (expected active, inactive, fault, standby or maintenance)")]
pub struct InverterStatusParseError(pub String);

impl std::str::FromStr for InverterStatus {
    type Err = InverterStatusParseError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| InverterStatusParseError(s.to_string()))
    }
}

// ============================================================================
// Raw Reading (ingestion boundary)
// ============================================================================

fn default_inverter_status() -> String {
    InverterStatus::Active.as_str().to_string()
}

fn default_grid_frequency() -> f64 {
    DEFAULT_GRID_FREQUENCY_HZ
}

/// One row of daily telemetry exactly as a source delivered it.
///
/// Dates and statuses are still text here; business rules are applied by
/// [`crate::validator::Validator`], which produces a [`Reading`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub plant_id: String,
    /// Expected as `YYYY-MM-DD`
    pub date: String,
    pub power_output_kwh: f64,
    pub efficiency_pct: f64,
    pub temperature_c: f64,
    pub irradiance_w_m2: f64,
    #[serde(default = "default_inverter_status")]
    pub inverter_status: String,
    #[serde(default = "default_grid_frequency")]
    pub grid_frequency_hz: f64,
}

impl From<&Reading> for RawReading {
    fn from(reading: &Reading) -> Self {
        Self {
            plant_id: reading.plant_id.clone(),
            date: reading.date.format(DATE_FORMAT).to_string(),
            power_output_kwh: reading.power_output_kwh,
            efficiency_pct: reading.efficiency_pct,
            temperature_c: reading.temperature_c,
            irradiance_w_m2: reading.irradiance_w_m2,
            inverter_status: reading.inverter_status.as_str().to_string(),
            grid_frequency_hz: reading.grid_frequency_hz,
        }
    }
}

// ============================================================================
// Validated Reading
// ============================================================================

/// A validated daily reading. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub plant_id: String,
    pub date: NaiveDate,
    /// Energy produced over the day (kWh, >= 0)
    pub power_output_kwh: f64,
    /// Conversion efficiency (0-100 %)
    pub efficiency_pct: f64,
    /// Panel temperature (°C)
    pub temperature_c: f64,
    /// Mean irradiance (0-1500 W/m²)
    pub irradiance_w_m2: f64,
    pub inverter_status: InverterStatus,
    /// Grid frequency (49.5-50.5 Hz)
    pub grid_frequency_hz: f64,
}

impl Reading {
    /// Same measurements, different day. Used by gap filling.
    pub fn with_date(&self, date: NaiveDate) -> Self {
        Self {
            date,
            ..self.clone()
        }
    }
}
