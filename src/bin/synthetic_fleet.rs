//! Synthetic Solar Fleet Generator
//!
//! Writes a plant registry CSV and a daily readings CSV for testing
//! solar-insights. Every plant gets:
//! - Annual seasonality (peak around the June solstice)
//! - Gaussian day-to-day noise
//! - A per-plant degradation rate
//!
//! Some plants also curtail output at weekends, and one plant gets an
//! injected inverter fault lasting a few days.
//!
//! # Usage
//! ```bash
//! ./synthetic-fleet --plants 5 --days 730 --seed 42
//! ./solar-insights --plants plants.csv --readings readings.csv
//! ```

use std::f64::consts::PI;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use solar_insights::types::{InverterStatus, RawReading, DATE_FORMAT};

// ============================================================================
// Plant Constants
// ============================================================================

/// Peak sun hours per day at nameplate capacity
const PEAK_SUN_HOURS: f64 = 5.0;
/// Nominal module efficiency (%)
const BASE_EFFICIENCY: f64 = 18.5;
/// Annual mean ambient temperature (°C)
const BASE_TEMPERATURE: f64 = 22.0;
/// Annual mean daily irradiance (W/m²)
const BASE_IRRADIANCE: f64 = 650.0;
/// Day of year with the highest yield
const PEAK_DAY_OF_YEAR: f64 = 172.0;
/// Output factor on curtailed weekend days
const WEEKEND_CURTAILMENT: f64 = 0.7;
/// Output factor during an injected fault
const FAULT_OUTPUT_FACTOR: f64 = 0.15;

const LOCATIONS: [&str; 6] = ["Arizona", "Nevada", "California", "Texas", "New Mexico", "Utah"];
const EQUIPMENT: [&str; 3] = ["Monocrystalline", "Polycrystalline", "Thin-film"];

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "synthetic-fleet")]
#[command(about = "Synthetic solar fleet data for solar-insights testing")]
#[command(version)]
struct Args {
    /// Number of plants
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=500))]
    plants: u32,

    /// Days of readings per plant
    #[arg(long, default_value = "730", value_parser = clap::value_parser!(u32).range(1..=7300))]
    days: u32,

    /// First reading date (YYYY-MM-DD)
    #[arg(long, default_value = "2023-01-01")]
    start: String,

    /// Seasonal amplitude as a fraction of mean output
    #[arg(long, default_value = "0.3")]
    seasonal_amplitude: f64,

    /// Relative day-to-day noise (standard deviation)
    #[arg(long, default_value = "0.04")]
    noise: f64,

    /// Probability that a day is missing from the output
    #[arg(long, default_value = "0.0")]
    gap_rate: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Plant registry output
    #[arg(long, default_value = "plants.csv")]
    plants_out: PathBuf,

    /// Readings output
    #[arg(long, default_value = "readings.csv")]
    readings_out: PathBuf,
}

// ============================================================================
// Plant Model
// ============================================================================

struct PlantProfile {
    plant_id: String,
    capacity_kw: f64,
    /// Fractional output loss per year
    degradation_per_year: f64,
    weekend_curtailment: bool,
    /// (first day index, length) of an injected fault
    fault: Option<(u32, u32)>,
}

struct Generator {
    rng: StdRng,
    noise: Normal<f64>,
    temperature_noise: Normal<f64>,
    frequency_noise: Normal<f64>,
    seasonal_amplitude: f64,
    gap_rate: f64,
}

impl Generator {
    fn new(args: &Args) -> Result<Self> {
        let rng = match args.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng,
            noise: Normal::new(1.0, args.noise).map_err(|e| anyhow!("invalid --noise: {e}"))?,
            temperature_noise: Normal::new(0.0, 2.0).map_err(|e| anyhow!("{e}"))?,
            frequency_noise: Normal::new(0.0, 0.04).map_err(|e| anyhow!("{e}"))?,
            seasonal_amplitude: args.seasonal_amplitude,
            gap_rate: args.gap_rate.clamp(0.0, 1.0),
        })
    }

    fn profile(&mut self, index: u32, days: u32) -> PlantProfile {
        let fault = (index == 0 && days > 30).then(|| (self.rng.gen_range(days / 2..days - 5), 4));
        PlantProfile {
            plant_id: format!("PLANT_{:03}", index + 1),
            capacity_kw: self.rng.gen_range(200.0..1000.0_f64).round(),
            degradation_per_year: self.rng.gen_range(0.002..0.06),
            weekend_curtailment: index % 3 == 1,
            fault,
        }
    }

    fn reading(&mut self, plant: &PlantProfile, day_index: u32, date: NaiveDate) -> RawReading {
        let season = (2.0 * PI * (f64::from(date.ordinal()) - PEAK_DAY_OF_YEAR) / 365.0).cos();
        let years = f64::from(day_index) / 365.25;
        let degradation = (1.0 - plant.degradation_per_year * years).max(0.0);

        let mut output = plant.capacity_kw * PEAK_SUN_HOURS * (1.0 + self.seasonal_amplitude * season);
        output *= degradation * self.noise.sample(&mut self.rng).max(0.0);
        if plant.weekend_curtailment && matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            output *= WEEKEND_CURTAILMENT;
        }

        let in_fault = plant
            .fault
            .is_some_and(|(start, len)| (start..start + len).contains(&day_index));
        let status = if in_fault {
            output *= FAULT_OUTPUT_FACTOR;
            InverterStatus::Fault
        } else if self.rng.gen_bool(0.01) {
            InverterStatus::Standby
        } else {
            InverterStatus::Active
        };

        RawReading {
            plant_id: plant.plant_id.clone(),
            date: date.format(DATE_FORMAT).to_string(),
            power_output_kwh: round2(output),
            efficiency_pct: round2(BASE_EFFICIENCY * degradation * self.noise.sample(&mut self.rng)),
            temperature_c: round2(BASE_TEMPERATURE + 12.0 * season + self.temperature_noise.sample(&mut self.rng)),
            irradiance_w_m2: round2((BASE_IRRADIANCE * (1.0 + 0.35 * season) * self.noise.sample(&mut self.rng)).clamp(0.0, 1400.0)),
            inverter_status: status.as_str().to_string(),
            grid_frequency_hz: round2((50.0 + self.frequency_noise.sample(&mut self.rng)).clamp(49.6, 50.4)),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let start = NaiveDate::parse_from_str(&args.start, DATE_FORMAT)
        .with_context(|| format!("Invalid --start date '{}'", args.start))?;
    let mut generator = Generator::new(&args)?;

    let mut plants_csv = csv::Writer::from_path(&args.plants_out)
        .with_context(|| format!("Failed to create {}", args.plants_out.display()))?;
    let mut readings_csv = csv::Writer::from_path(&args.readings_out)
        .with_context(|| format!("Failed to create {}", args.readings_out.display()))?;

    plants_csv.write_record(["plant_id", "plant_name", "capacity_kw", "location", "installation_date", "equipment_type"])?;

    let mut total = 0usize;
    for index in 0..args.plants {
        let plant = generator.profile(index, args.days);
        let slot = index as usize;
        let installed = start.with_year(start.year() - 1 - (index % 4) as i32).unwrap_or(start);
        let location = LOCATIONS[slot % LOCATIONS.len()];
        let name = format!("{location} Solar Farm {}", index + 1);
        let capacity = plant.capacity_kw.to_string();
        let installed = installed.format(DATE_FORMAT).to_string();
        plants_csv.write_record([
            plant.plant_id.as_str(),
            name.as_str(),
            capacity.as_str(),
            location,
            installed.as_str(),
            EQUIPMENT[slot % EQUIPMENT.len()],
        ])?;

        for (day_index, date) in (0..args.days).zip(start.iter_days()) {
            if generator.gap_rate > 0.0 && generator.rng.gen_bool(generator.gap_rate) {
                continue;
            }
            readings_csv.serialize(generator.reading(&plant, day_index, date))?;
            total += 1;
        }

        eprintln!(
            "  {} {:>6.0} kW  degradation {:.1}%/yr{}{}",
            plant.plant_id,
            plant.capacity_kw,
            plant.degradation_per_year * 100.0,
            if plant.weekend_curtailment { "  weekend curtailment" } else { "" },
            plant
                .fault
                .map_or_else(String::new, |(s, l)| format!("  fault days {s}..{}", s + l)),
        );
    }

    plants_csv.flush()?;
    readings_csv.flush()?;
    eprintln!(
        "Wrote {} plants to {} and {total} readings to {}",
        args.plants,
        args.plants_out.display(),
        args.readings_out.display()
    );
    Ok(())
}
