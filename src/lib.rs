//! # trackdiag - Tracking Filter Diagnostics
//!
//! Consistency analysis and trajectory views for the CSV logs written by a
//! multi-target tracking filter.
//!
//! The core computes the Normalized Innovation Squared (NIS) statistic
//! `v^T S^-1 v` for every logged innovation, drops statistically degenerate
//! observations, and aggregates the result per track for plotting.
//!
//! ## Features
//!
//! - Schema-checked ingestion of `residuals.csv`, `tracks.csv` and `truth.csv`
//! - Closed-form 2x2 NIS evaluation with a degenerate/non-finite drop policy
//! - Per-track, step-ordered series with deterministic track ordering
//! - Trajectory and residual-consistency views
//! - PNG and JSON rendering sinks
//!
//! ## Example
//!
//! ```rust,ignore
//! use trackdiag_rs::{analysis, AnalysisConfig, RunDirectory};
//!
//! let run = RunDirectory::new("out/run_01");
//! let config = AnalysisConfig::default();
//! let request = analysis::nis_request(&run, &config)?;
//! for series in &request.series {
//!     println!("{}: {} points", series.label, series.points.len());
//! }
//! ```

// Public modules
pub mod records;
pub mod ingest;
pub mod nis;
pub mod aggregate;
pub mod views;
pub mod render;
pub mod config;
pub mod run;
pub mod analysis;
pub mod utils;

// Re-exports for convenience
pub use records::{InnovationRecord, TrackEstimateRecord, TruthRecord};
pub use nis::{evaluate, InvalidNis, NisEvaluator, NisTally};
pub use aggregate::PerTrackSeries;
pub use views::{RenderRequest, Series, SeriesStyle};
pub use render::{JsonSink, OutputFormat, PngChartSink, RenderSink};
pub use config::{AnalysisConfig, ChartConfig};
pub use run::RunDirectory;

// Error types
pub use crate::error::{Error, Result};

mod error {
    use std::path::PathBuf;
    use thiserror::Error;

    /// Errors that can occur while analysing tracker logs.
    ///
    /// Every variant is fatal for the run. Statistically degenerate rows are
    /// not errors; see [`crate::nis::InvalidNis`].
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("missing required field '{field}' (line {line})")]
        Schema { field: String, line: usize },

        #[error("line {line}: field '{field}' value {value:?} is not a valid {expected}")]
        Parse {
            field: String,
            value: String,
            expected: &'static str,
            line: usize,
        },

        #[error("Missing: {}", .0.display())]
        MissingInputSource(PathBuf),

        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),

        #[error("CSV error: {0}")]
        Csv(#[from] csv::Error),

        #[error("Image error: {0}")]
        Image(#[from] image::ImageError),

        #[error("JSON error: {0}")]
        Json(#[from] serde_json::Error),

        #[error("IO error: {0}")]
        IoError(#[from] std::io::Error),
    }

    /// Result type for trackdiag operations
    pub type Result<T> = std::result::Result<T, Error>;
}
