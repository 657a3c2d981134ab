//! Plant registry entry.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Descriptive metadata for one solar plant.
///
/// Context only: none of these fields feed the numeric analysis. The
/// trailing status fields are filled in by the pipeline after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub plant_id: String,
    pub plant_name: String,
    /// Nameplate capacity (kW, > 0)
    pub capacity_kw: f64,
    pub location: String,
    pub installation_date: NaiveDate,
    /// Panel technology, e.g. "Monocrystalline"
    pub equipment_type: String,

    // === Run status (not part of the registry CSV) ===
    #[serde(default)]
    pub current_health_score: f64,
    #[serde(default)]
    pub last_analysis_date: Option<NaiveDate>,
    #[serde(default)]
    pub anomaly_count_7d: usize,
    #[serde(default)]
    pub anomaly_count_30d: usize,
}

impl Plant {
    pub fn new(
        plant_id: impl Into<String>,
        plant_name: impl Into<String>,
        capacity_kw: f64,
        location: impl Into<String>,
        installation_date: NaiveDate,
        equipment_type: impl Into<String>,
    ) -> Self {
        Self {
            plant_id: plant_id.into(),
            plant_name: plant_name.into(),
            capacity_kw,
            location: location.into(),
            installation_date,
            equipment_type: equipment_type.into(),
            current_health_score: 0.0,
            last_analysis_date: None,
            anomaly_count_7d: 0,
            anomaly_count_30d: 0,
        }
    }
}
