//! Typed records read from a tracker run.

use nalgebra::{Matrix2, Vector2};

use crate::ingest::{Field, FromRow, Schema, TypedRow};
use crate::nis::{InvalidNis, NisEvaluator};
use crate::Result;

/// `true_id` value meaning "no associated ground truth".
pub const NO_TRUTH_ID: i64 = 0;

/// Fields of `residuals.csv`.
pub static INNOVATION_SCHEMA: Schema = Schema::new("innovation", INNOVATION_FIELDS);

const INNOVATION_FIELDS: &[Field] = &[
    Field::int("step"),
    Field::int("track_id"),
    Field::real("innov_x"),
    Field::real("innov_y"),
    Field::real("S00"),
    Field::real("S01"),
    Field::real("S10"),
    Field::real("S11"),
];

/// Fields of `tracks.csv`.
///
/// The tracker writes the hit-window column as `hits`, which is accepted as
/// an alias of `hits_window`.
pub static TRACK_ESTIMATE_SCHEMA: Schema = Schema::new("track_estimate", TRACK_ESTIMATE_FIELDS);

const TRACK_ESTIMATE_FIELDS: &[Field] = &[
    Field::int("step"),
    Field::int("track_id"),
    Field::flag("confirmed"),
    Field::real("x"),
    Field::real("y"),
    Field::real("vx"),
    Field::real("vy"),
    Field::int("misses"),
    Field::real("maha2"),
    Field::int("hits_window").with_aliases(&["hits"]),
];

/// Fields of `truth.csv`.
pub static TRUTH_SCHEMA: Schema = Schema::new("truth", TRUTH_FIELDS);

const TRUTH_FIELDS: &[Field] = &[
    Field::int("step"),
    Field::int("true_id"),
    Field::real("x"),
    Field::real("y"),
    Field::real("vx"),
    Field::real("vy"),
];

/// One measurement-update event for one track at one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InnovationRecord {
    pub step: i64,
    pub track_id: i64,
    /// Measurement minus predicted measurement.
    pub innovation: Vector2<f64>,
    /// Predicted innovation covariance `S`. Not assumed symmetric.
    pub innovation_covariance: Matrix2<f64>,
}

impl InnovationRecord {
    /// `s` is given row-major: `[[S00, S01], [S10, S11]]`.
    pub fn new(step: i64, track_id: i64, innovation: [f64; 2], s: [[f64; 2]; 2]) -> Self {
        Self {
            step,
            track_id,
            innovation: Vector2::new(innovation[0], innovation[1]),
            innovation_covariance: Matrix2::new(s[0][0], s[0][1], s[1][0], s[1][1]),
        }
    }

    /// Normalized innovation squared for this record.
    pub fn nis(&self, evaluator: &NisEvaluator) -> std::result::Result<f64, InvalidNis> {
        evaluator.evaluate(&self.innovation, &self.innovation_covariance)
    }
}

impl FromRow for InnovationRecord {
    fn schema() -> &'static Schema {
        &INNOVATION_SCHEMA
    }

    fn from_row(row: &TypedRow) -> Result<Self> {
        Ok(Self::new(
            row.int("step")?,
            row.int("track_id")?,
            [row.real("innov_x")?, row.real("innov_y")?],
            [
                [row.real("S00")?, row.real("S01")?],
                [row.real("S10")?, row.real("S11")?],
            ],
        ))
    }
}

/// One filter state estimate for one track at one step.
///
/// Only `step`, `track_id` and `position` are used by the trajectory view;
/// the rest are carried through as logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackEstimateRecord {
    pub step: i64,
    pub track_id: i64,
    pub confirmed: bool,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    /// Consecutive missed updates.
    pub misses: i64,
    /// Mahalanobis-squared distance from the association step.
    pub maha2: f64,
    pub hits_window: i64,
}

impl FromRow for TrackEstimateRecord {
    fn schema() -> &'static Schema {
        &TRACK_ESTIMATE_SCHEMA
    }

    fn from_row(row: &TypedRow) -> Result<Self> {
        Ok(Self {
            step: row.int("step")?,
            track_id: row.int("track_id")?,
            confirmed: row.flag("confirmed")?,
            position: Vector2::new(row.real("x")?, row.real("y")?),
            velocity: Vector2::new(row.real("vx")?, row.real("vy")?),
            misses: row.int("misses")?,
            maha2: row.real("maha2")?,
            hits_window: row.int("hits_window")?,
        })
    }
}

/// One ground-truth trajectory sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruthRecord {
    pub step: i64,
    pub true_id: i64,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
}

impl TruthRecord {
    /// False for the [`NO_TRUTH_ID`] sentinel.
    pub fn has_truth(&self) -> bool {
        self.true_id != NO_TRUTH_ID
    }
}

impl FromRow for TruthRecord {
    fn schema() -> &'static Schema {
        &TRUTH_SCHEMA
    }

    fn from_row(row: &TypedRow) -> Result<Self> {
        Ok(Self {
            step: row.int("step")?,
            true_id: row.int("true_id")?,
            position: Vector2::new(row.real("x")?, row.real("y")?),
            velocity: Vector2::new(row.real("vx")?, row.real("vy")?),
        })
    }
}
