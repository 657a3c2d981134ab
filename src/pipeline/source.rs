//! Input source abstraction for plant registries and daily readings.
//!
//! Provides traits for loading plants and raw readings from different
//! sources: CSV files (csv crate, header-based) and in-memory collections.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::types::{Plant, RawReading};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The whole source could not be opened or read
    #[error("{0} unavailable: {1}")]
    Unavailable(String, String),

    /// One record could not be decoded; the rest of the source is usable
    #[error("{0}: malformed record at line {1}: {2}")]
    Malformed(String, u64, String),
}

/// Records read from a source plus the ones that had to be skipped.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SourceError>,
}

impl<T> Loaded<T> {
    pub const fn clean(records: Vec<T>) -> Self {
        Self {
            records,
            skipped: Vec::new(),
        }
    }
}

/// Trait abstracting where the plant registry comes from.
pub trait PlantSource {
    /// Returns `Err` only when nothing could be read at all.
    fn load_plants(&self) -> Result<Loaded<Plant>, SourceError>;

    /// Human-readable name for logging (e.g. a file path).
    fn source_name(&self) -> String;
}

/// Trait abstracting where raw daily readings come from.
pub trait ReadingSource {
    /// Returns `Err` only when nothing could be read at all.
    fn load_readings(&self) -> Result<Loaded<RawReading>, SourceError>;

    fn source_name(&self) -> String;
}

// ============================================================================
// CSV Sources
// ============================================================================

/// `plant_id,plant_name,capacity_kw,location,installation_date,equipment_type`
pub struct CsvPlantSource {
    path: PathBuf,
}

impl CsvPlantSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PlantSource for CsvPlantSource {
    fn load_plants(&self) -> Result<Loaded<Plant>, SourceError> {
        let name = PlantSource::source_name(self);
        let loaded = read_csv::<Plant, Plant>(&self.path, &name, |plant, line| {
            if plant.capacity_kw > 0.0 && plant.capacity_kw.is_finite() {
                Ok(plant)
            } else {
                Err(SourceError::Malformed(
                    name.clone(),
                    line,
                    format!("capacity_kw must be positive, got {}", plant.capacity_kw),
                ))
            }
        })?;
        info!(source = %name, plants = loaded.records.len(), skipped = loaded.skipped.len(), "Loaded plant registry");
        Ok(loaded)
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Header row must include `plant_id,date,power_output_kwh,efficiency_pct,
/// temperature_c,irradiance_w_m2`; `inverter_status` and `grid_frequency_hz`
/// are optional and default to `active` / 50 Hz when absent or empty.
pub struct CsvReadingSource {
    path: PathBuf,
}

impl CsvReadingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, Deserialize)]
struct CsvReadingRow {
    plant_id: String,
    date: String,
    power_output_kwh: f64,
    efficiency_pct: f64,
    temperature_c: f64,
    irradiance_w_m2: f64,
    #[serde(default)]
    inverter_status: Option<String>,
    #[serde(default)]
    grid_frequency_hz: Option<f64>,
}

impl From<CsvReadingRow> for RawReading {
    fn from(row: CsvReadingRow) -> Self {
        Self {
            plant_id: row.plant_id,
            date: row.date,
            power_output_kwh: row.power_output_kwh,
            efficiency_pct: row.efficiency_pct,
            temperature_c: row.temperature_c,
            irradiance_w_m2: row.irradiance_w_m2,
            inverter_status: row
                .inverter_status
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "active".to_string()),
            grid_frequency_hz: row
                .grid_frequency_hz
                .unwrap_or(crate::types::DEFAULT_GRID_FREQUENCY_HZ),
        }
    }
}

impl ReadingSource for CsvReadingSource {
    fn load_readings(&self) -> Result<Loaded<RawReading>, SourceError> {
        let name = ReadingSource::source_name(self);
        let loaded = read_csv::<CsvReadingRow, RawReading>(&self.path, &name, |row, _| Ok(row.into()))?;
        info!(source = %name, readings = loaded.records.len(), skipped = loaded.skipped.len(), "Loaded readings");
        Ok(loaded)
    }

    fn source_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Deserialize every row of `path`, skipping rows that fail to decode or
/// that `check` rejects.
fn read_csv<Row, T>(
    path: &Path,
    name: &str,
    check: impl Fn(Row, u64) -> Result<T, SourceError>,
) -> Result<Loaded<T>, SourceError>
where
    Row: for<'de> Deserialize<'de>,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| SourceError::Unavailable(name.to_string(), e.to_string()))?;

    let mut loaded = Loaded::clean(Vec::new());
    for result in reader.deserialize::<Row>() {
        let outcome = match result {
            Ok(row) => {
                // Header is line 1
                let line = loaded.records.len() as u64 + loaded.skipped.len() as u64 + 2;
                check(row, line)
            }
            Err(e) => {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(SourceError::Unavailable(name.to_string(), e.to_string()));
                }
                let line = e.position().map_or(0, csv::Position::line);
                Err(SourceError::Malformed(name.to_string(), line, e.to_string()))
            }
        };
        match outcome {
            Ok(record) => loaded.records.push(record),
            Err(e) => {
                warn!(source = %name, error = %e, "Skipping record");
                loaded.skipped.push(e);
            }
        }
    }
    Ok(loaded)
}

// ============================================================================
// In-Memory Source
// ============================================================================

/// Plants and readings held in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub plants: Vec<Plant>,
    pub readings: Vec<RawReading>,
}

impl InMemorySource {
    pub const fn new(plants: Vec<Plant>, readings: Vec<RawReading>) -> Self {
        Self { plants, readings }
    }
}

impl PlantSource for InMemorySource {
    fn load_plants(&self) -> Result<Loaded<Plant>, SourceError> {
        Ok(Loaded::clean(self.plants.clone()))
    }

    fn source_name(&self) -> String {
        "memory".to_string()
    }
}

impl ReadingSource for InMemorySource {
    fn load_readings(&self) -> Result<Loaded<RawReading>, SourceError> {
        Ok(Loaded::clean(self.readings.clone()))
    }

    fn source_name(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_csv_readings_with_optional_columns() {
        let file = write_temp(
            "plant_id,date,power_output_kwh,efficiency_pct,temperature_c,irradiance_w_m2,inverter_status,grid_frequency_hz\n\
             PLANT_001,2025-01-01,450.5,18.2,32.1,820,active,50.01\n\
             PLANT_001,2025-01-02,440.0,18.0,31.0,800,,\n",
        );
        let loaded = CsvReadingSource::new(file.path()).load_readings().unwrap();
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].grid_frequency_hz, 50.01);
        assert_eq!(loaded.records[1].inverter_status, "active");
        assert_eq!(loaded.records[1].grid_frequency_hz, 50.0);
    }

    #[test]
    fn test_csv_readings_without_optional_columns() {
        let file = write_temp(
            "plant_id,date,power_output_kwh,efficiency_pct,temperature_c,irradiance_w_m2\n\
             PLANT_001,2025-01-01,450.5,18.2,32.1,820\n",
        );
        let loaded = CsvReadingSource::new(file.path()).load_readings().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].inverter_status, "active");
    }

    #[test]
    fn test_malformed_row_skipped() {
        let file = write_temp(
            "plant_id,date,power_output_kwh,efficiency_pct,temperature_c,irradiance_w_m2\n\
             PLANT_001,2025-01-01,not-a-number,18.2,32.1,820\n\
             PLANT_001,2025-01-02,440.0,18.0,31.0,800\n",
        );
        let loaded = CsvReadingSource::new(file.path()).load_readings().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(matches!(loaded.skipped[0], SourceError::Malformed(_, 2, _)));
    }

    #[test]
    fn test_plants_capacity_must_be_positive() {
        let file = write_temp(
            "plant_id,plant_name,capacity_kw,location,installation_date,equipment_type\n\
             PLANT_001,Desert Sun,500,Arizona,2020-03-15,Monocrystalline\n\
             PLANT_002,Broken,0,Nevada,2021-06-01,Thin-film\n",
        );
        let loaded = CsvPlantSource::new(file.path()).load_plants().unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].plant_name, "Desert Sun");
        assert_eq!(loaded.records[0].last_analysis_date, None);
        assert_eq!(loaded.skipped, vec![SourceError::Malformed(
            PlantSource::source_name(&CsvPlantSource::new(file.path())),
            3,
            "capacity_kw must be positive, got 0".to_string(),
        )]);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = CsvReadingSource::new("/nonexistent/readings.csv").load_readings().unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_, _)));
    }
}
