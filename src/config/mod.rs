//! Analytics Configuration Module
//!
//! Provides run configuration loaded from TOML files, so every analysis
//! threshold is operator-tunable.
//!
//! ## Loading Order
//!
//! 1. `SOLAR_INSIGHTS_CONFIG` environment variable (path to TOML file)
//! 2. `solar_insights.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! ## Usage
//!
//! The config is an ordinary value owned by the caller and handed to the
//! pipeline at construction:
//!
//! ```ignore
//! let config = AnalyticsConfig::load();
//! let pipeline = Pipeline::new(&config);
//! ```

mod analytics_config;
pub mod defaults;
pub mod validation;

pub use analytics_config::*;
