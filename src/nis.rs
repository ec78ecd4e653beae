//! Normalized Innovation Squared (NIS) evaluation.
//!
//! `NIS = v^T S^-1 v` for a 2-D innovation `v` and its predicted covariance
//! `S`. The inverse is the closed-form 2x2 adjugate over the determinant; the
//! off-diagonal entries of `S` are used as given, without assuming symmetry.
//!
//! Observations that cannot produce a meaningful statistic are reported as
//! [`InvalidNis`] and dropped by callers. They are expected (e.g. a track whose
//! covariance has not been initialised logs `S = 0`) and never abort a run.

use std::fmt;

use nalgebra::{Matrix2, Vector2};

use crate::{Error, Result};

/// Why an observation has no usable NIS value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidNis {
    /// `det(S)` is zero (or within the evaluator's singular tolerance).
    DegenerateCovariance { determinant: f64 },
    /// The quadratic form came out NaN or infinite.
    NonFiniteResult { value: f64 },
}

impl fmt::Display for InvalidNis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidNis::DegenerateCovariance { determinant } => {
                write!(f, "degenerate covariance (det = {})", determinant)
            }
            InvalidNis::NonFiniteResult { value } => write!(f, "non-finite NIS ({})", value),
        }
    }
}

/// Evaluate NIS with the default policy (only `det == 0` is degenerate).
pub fn evaluate(v: &Vector2<f64>, s: &Matrix2<f64>) -> std::result::Result<f64, InvalidNis> {
    NisEvaluator::default().evaluate(v, s)
}

/// NIS evaluator with a configurable near-singular policy.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NisEvaluator {
    /// Covariances with `|det(S)| <= singular_tolerance` are degenerate.
    ///
    /// The default `0.0` flags only an exactly singular `S`; ill-conditioned
    /// but invertible covariances still produce (possibly huge) values.
    pub singular_tolerance: f64,
}

impl NisEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_singular_tolerance(singular_tolerance: f64) -> Self {
        Self { singular_tolerance }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.singular_tolerance.is_finite() || self.singular_tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "singular tolerance must be finite and non-negative, got {}",
                self.singular_tolerance
            )));
        }
        Ok(())
    }

    /// Compute `v^T S^-1 v`.
    pub fn evaluate(
        &self,
        v: &Vector2<f64>,
        s: &Matrix2<f64>,
    ) -> std::result::Result<f64, InvalidNis> {
        let (s00, s01, s10, s11) = (s[(0, 0)], s[(0, 1)], s[(1, 0)], s[(1, 1)]);
        let det = s00 * s11 - s01 * s10;

        // NaN determinants fall through and are caught as non-finite below.
        if det.abs() <= self.singular_tolerance {
            return Err(InvalidNis::DegenerateCovariance { determinant: det });
        }

        let inv00 = s11 / det;
        let inv01 = -s01 / det;
        let inv10 = -s10 / det;
        let inv11 = s00 / det;

        let (v0, v1) = (v[0], v[1]);
        let nis = v0 * (inv00 * v0 + inv01 * v1) + v1 * (inv10 * v0 + inv11 * v1);

        if !nis.is_finite() {
            return Err(InvalidNis::NonFiniteResult { value: nis });
        }
        Ok(nis)
    }
}

/// Per-run counts of evaluated and dropped observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NisTally {
    pub evaluated: usize,
    pub valid: usize,
    pub degenerate: usize,
    pub non_finite: usize,
}

impl NisTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &std::result::Result<f64, InvalidNis>) {
        self.evaluated += 1;
        match outcome {
            Ok(_) => self.valid += 1,
            Err(InvalidNis::DegenerateCovariance { .. }) => self.degenerate += 1,
            Err(InvalidNis::NonFiniteResult { .. }) => self.non_finite += 1,
        }
    }

    pub fn dropped(&self) -> usize {
        self.degenerate + self.non_finite
    }
}
