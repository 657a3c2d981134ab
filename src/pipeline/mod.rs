//! Analysis Pipeline Module
//!
//! Sequences validation, baselines, anomaly detection, pattern detection,
//! insights and health scoring over a fleet of plants.
//!
//! - `source`: where plants and readings come from (CSV, in-memory)
//! - `orchestrator`: the [`Pipeline`] itself
//! - `summary`: the [`PipelineResult`] a run produces

mod orchestrator;
pub mod source;
mod summary;

pub use orchestrator::{Pipeline, RunOptions};
pub use source::{
    CsvPlantSource, CsvReadingSource, InMemorySource, Loaded, PlantSource, ReadingSource, SourceError,
};
pub use summary::{AnomalySummary, IssueScope, PipelineIssue, PipelineResult, PlantAnomalySummary};
