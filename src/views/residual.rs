//! Residual-consistency view: NIS per track against step.

use tracing::{debug, info};

use super::{RenderRequest, Series, SeriesStyle, ViewKind};
use crate::aggregate::PerTrackSeries;
use crate::nis::{NisEvaluator, NisTally};
use crate::records::InnovationRecord;

/// Y-axis label for NIS charts.
pub const NIS_AXIS_LABEL: &str = "NIS (v^T S^-1 v)";

/// Valid NIS values grouped per track, plus what was dropped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualView {
    pub nis: PerTrackSeries<f64>,
    pub tally: NisTally,
}

impl ResidualView {
    /// Evaluate every record and aggregate the valid results.
    ///
    /// Degenerate or non-finite observations contribute nothing: no
    /// placeholder, no gap marker.
    pub fn build<I>(records: I, evaluator: &NisEvaluator) -> Self
    where
        I: IntoIterator<Item = InnovationRecord>,
    {
        let mut tally = NisTally::new();
        let samples: Vec<(i64, i64, f64)> = records
            .into_iter()
            .filter_map(|record| {
                let outcome = record.nis(evaluator);
                tally.record(&outcome);
                match outcome {
                    Ok(nis) => Some((record.track_id, record.step, nis)),
                    Err(reason) => {
                        debug!(
                            step = record.step,
                            track_id = record.track_id,
                            %reason,
                            "dropping observation"
                        );
                        None
                    }
                }
            })
            .collect();

        let nis = PerTrackSeries::from_samples(samples);
        info!(
            evaluated = tally.evaluated,
            valid = tally.valid,
            degenerate = tally.degenerate,
            non_finite = tally.non_finite,
            tracks = nis.len(),
            "evaluated NIS"
        );
        Self { nis, tally }
    }

    pub fn default_title(run_name: &str) -> String {
        format!("NIS per Track ({})", run_name)
    }

    /// One `track {id}` line per track, in ascending id order.
    pub fn to_request(&self, title: impl Into<String>) -> RenderRequest {
        let mut request = RenderRequest::new(ViewKind::Nis, title, "step", NIS_AXIS_LABEL);
        for (track_id, samples) in self.nis.iter() {
            let points = samples
                .iter()
                .map(|(step, nis)| (*step as f64, *nis))
                .collect();
            request.push(Series::new(
                format!("track {}", track_id),
                SeriesStyle::RESIDUAL,
                points,
            ));
        }
        request
    }
}
