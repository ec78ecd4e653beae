//! Trajectory view: ground truth against track estimates in the x/y plane.

use nalgebra::Vector2;
use tracing::info;

use super::{RenderRequest, Series, SeriesStyle, ViewKind};
use crate::aggregate::PerTrackSeries;
use crate::records::{TrackEstimateRecord, TruthRecord};

/// Truth and estimated positions grouped by id and ordered by step.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryView {
    /// Keyed by `true_id`; the no-truth sentinel is never present.
    pub truth: PerTrackSeries<Vector2<f64>>,
    /// Keyed by `track_id`.
    pub tracks: PerTrackSeries<Vector2<f64>>,
}

impl TrajectoryView {
    pub fn build<T, E>(truth: T, tracks: E) -> Self
    where
        T: IntoIterator<Item = TruthRecord>,
        E: IntoIterator<Item = TrackEstimateRecord>,
    {
        let truth = PerTrackSeries::from_samples(
            truth
                .into_iter()
                .filter(TruthRecord::has_truth)
                .map(|r| (r.true_id, r.step, r.position)),
        );
        let tracks = PerTrackSeries::from_samples(
            tracks
                .into_iter()
                .map(|r| (r.track_id, r.step, r.position)),
        );

        info!(
            truth_trajectories = truth.len(),
            tracks = tracks.len(),
            "built trajectory view"
        );
        Self { truth, tracks }
    }

    pub fn default_title(run_name: &str) -> String {
        format!("Truth vs Track Estimates ({})", run_name)
    }

    /// Truth lines first, then track estimates, each in ascending id order.
    pub fn to_request(&self, title: impl Into<String>) -> RenderRequest {
        let mut request = RenderRequest::new(ViewKind::Tracks, title, "x", "y");
        request.equal_aspect = true;

        let groups = [
            ("truth", SeriesStyle::TRUTH, &self.truth),
            ("track", SeriesStyle::ESTIMATE, &self.tracks),
        ];
        for (prefix, style, positions) in groups {
            for (id, samples) in positions.map_values(|p| (p.x, p.y)) {
                let points = samples.into_iter().map(|(_, xy)| xy).collect();
                request.push(Series::new(format!("{} {}", prefix, id), style, points));
            }
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::SeriesRole;

    fn truth(step: i64, true_id: i64, x: f64, y: f64) -> TruthRecord {
        TruthRecord {
            step,
            true_id,
            position: Vector2::new(x, y),
            velocity: Vector2::zeros(),
        }
    }

    fn estimate(step: i64, track_id: i64, x: f64, y: f64) -> TrackEstimateRecord {
        TrackEstimateRecord {
            step,
            track_id,
            confirmed: true,
            position: Vector2::new(x, y),
            velocity: Vector2::zeros(),
            misses: 0,
            maha2: 0.0,
            hits_window: 1,
        }
    }

    #[test]
    fn test_sentinel_truth_is_excluded() {
        let view = TrajectoryView::build(
            vec![
                truth(0, 0, 9.0, 9.0),
                truth(0, 2, 0.0, 0.0),
                truth(1, 0, 9.0, 9.0),
                truth(1, 2, 1.0, 1.0),
                truth(2, 2, 2.0, 1.5),
            ],
            Vec::new(),
        );

        let ids: Vec<i64> = view.truth.track_ids().collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(view.truth.get(2).unwrap().len(), 3);

        let request = view.to_request("t");
        assert!(request.get("truth 0").is_none());
        assert_eq!(
            request.get("truth 2").unwrap().points,
            vec![(0.0, 0.0), (1.0, 1.0), (2.0, 1.5)]
        );
    }

    #[test]
    fn test_estimates_sorted_by_step() {
        let view = TrajectoryView::build(
            Vec::new(),
            vec![
                estimate(2, 7, 2.0, 0.0),
                estimate(0, 7, 0.0, 0.0),
                estimate(1, 7, 1.0, 0.0),
            ],
        );
        let request = view.to_request("t");

        assert_eq!(
            request.get("track 7").unwrap().points,
            vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]
        );
    }

    #[test]
    fn test_request_layout() {
        let view = TrajectoryView::build(
            vec![truth(0, 3, 0.0, 0.0), truth(0, 1, 5.0, 5.0)],
            vec![estimate(0, 4, 0.1, 0.0), estimate(0, 2, 5.1, 5.0)],
        );
        let request = view.to_request(TrajectoryView::default_title("sim"));

        assert_eq!(request.kind, ViewKind::Tracks);
        assert_eq!(request.title, "Truth vs Track Estimates (sim)");
        assert!(request.equal_aspect);

        let labels: Vec<&str> = request.labels().collect();
        assert_eq!(labels, vec!["truth 1", "truth 3", "track 2", "track 4"]);
        assert_eq!(request.get("truth 1").unwrap().style.role, SeriesRole::Truth);
        assert_eq!(
            request.get("track 2").unwrap().style.role,
            SeriesRole::Estimate
        );
    }
}
