//! End-to-end analyses over a run directory.
//!
//! Each analysis is ingest, evaluate, aggregate, then build a render request.
//! Fatal errors surface before any output is written.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{AnalysisConfig, ChartConfig};
use crate::ingest::ingest_csv;
use crate::records::{InnovationRecord, TrackEstimateRecord, TruthRecord};
use crate::render::{sink_for, OutputFormat};
use crate::run::RunDirectory;
use crate::views::{RenderRequest, ResidualView, TrajectoryView};
use crate::Result;

/// Ingest `residuals.csv` and evaluate NIS for every row.
pub fn residual_view(run: &RunDirectory, config: &AnalysisConfig) -> Result<ResidualView> {
    config.validate()?;
    let path = run.require_residuals()?;
    let records: Vec<InnovationRecord> = ingest_csv(&path)?;
    Ok(ResidualView::build(records, &config.evaluator))
}

/// Ingest `truth.csv` and `tracks.csv`.
///
/// Both files must exist before either is read.
pub fn trajectory_view(run: &RunDirectory, config: &AnalysisConfig) -> Result<TrajectoryView> {
    config.validate()?;
    let truth_path = run.require_truth()?;
    let tracks_path = run.require_tracks()?;
    let truth: Vec<TruthRecord> = ingest_csv(&truth_path)?;
    let tracks: Vec<TrackEstimateRecord> = ingest_csv(&tracks_path)?;
    Ok(TrajectoryView::build(truth, tracks))
}

pub fn nis_request(run: &RunDirectory, config: &AnalysisConfig) -> Result<RenderRequest> {
    let view = residual_view(run, config)?;
    let title = config.title_or(|| ResidualView::default_title(&run.name()));
    Ok(view.to_request(title))
}

pub fn trajectory_request(run: &RunDirectory, config: &AnalysisConfig) -> Result<RenderRequest> {
    let view = trajectory_view(run, config)?;
    let title = config.title_or(|| TrajectoryView::default_title(&run.name()));
    Ok(view.to_request(title))
}

/// Render `request` to `path`, creating parent directories as needed.
pub fn write_request<P: AsRef<Path>>(
    request: &RenderRequest,
    path: P,
    format: OutputFormat,
    chart: &ChartConfig,
) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut sink = sink_for(format, path, chart);
    sink.render(request)?;
    info!(
        path = %path.display(),
        output_format = %format,
        series = request.series.len(),
        "wrote chart"
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nis::NisEvaluator;
    use crate::Error;
    use std::fs;

    const RESIDUALS: &str = "\
step,track_id,innov_x,innov_y,S00,S01,S10,S11
0,1,1.0,0.0,1.0,0.0,0.0,1.0
1,1,0.0,2.0,1.0,0.0,0.0,4.0
";

    fn run_with_residuals(contents: &str) -> (tempfile::TempDir, RunDirectory) {
        let dir = tempfile::tempdir().unwrap();
        let run_dir = dir.path().join("run_a");
        fs::create_dir(&run_dir).unwrap();
        fs::write(run_dir.join("residuals.csv"), contents).unwrap();
        (dir, RunDirectory::new(run_dir))
    }

    #[test]
    fn test_nis_request() {
        let (_dir, run) = run_with_residuals(RESIDUALS);
        let request = nis_request(&run, &AnalysisConfig::default()).unwrap();

        assert_eq!(request.title, "NIS per Track (run_a)");
        assert_eq!(
            request.get("track 1").unwrap().points,
            vec![(0.0, 1.0), (1.0, 1.0)]
        );
    }

    #[test]
    fn test_title_override() {
        let (_dir, run) = run_with_residuals(RESIDUALS);
        let config = AnalysisConfig {
            title: Some("custom".to_string()),
            ..AnalysisConfig::default()
        };
        assert_eq!(nis_request(&run, &config).unwrap().title, "custom");
    }

    #[test]
    fn test_invalid_config_fails_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let run = RunDirectory::new(dir.path());
        let config = AnalysisConfig {
            evaluator: NisEvaluator::with_singular_tolerance(f64::NAN),
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            nis_request(&run, &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_trajectory_requires_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let run = RunDirectory::new(dir.path());
        // tracks.csv present but malformed: the missing truth file wins.
        fs::write(run.tracks_path(), "garbage").unwrap();

        match trajectory_request(&run, &AnalysisConfig::default()) {
            Err(Error::MissingInputSource(path)) => assert_eq!(path, run.truth_path()),
            other => panic!("expected MissingInputSource, got {:?}", other),
        }
    }

    #[test]
    fn test_write_request_creates_directories() {
        let (dir, run) = run_with_residuals(RESIDUALS);
        let request = nis_request(&run, &AnalysisConfig::default()).unwrap();
        let out = dir.path().join("plots").join("nested").join("nis.json");

        let written =
            write_request(&request, &out, OutputFormat::Json, &ChartConfig::default()).unwrap();
        assert_eq!(written, out);
        assert!(out.is_file());
    }
}
