//! Shared data structures for solar plant analytics
//!
//! - `RawReading` / `Reading`: daily telemetry before and after validation
//! - `Plant`: registry metadata
//! - `Metric`: closed set of analysable reading fields
//! - `Baseline`, `Anomaly`, `Pattern`, `Insight`, `HealthScore`: derived artifacts

mod anomaly;
mod baseline;
mod health;
mod insight;
mod metric;
mod pattern;
mod plant;
mod reading;

pub use anomaly::*;
pub use baseline::*;
pub use health::*;
pub use insight::*;
pub use metric::*;
pub use pattern::*;
pub use plant::*;
pub use reading::*;
