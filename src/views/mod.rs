//! Analysis views and the rendering request they produce.
//!
//! - `ResidualView` - NIS against step, one line per track
//! - `TrajectoryView` - truth and estimated positions in the x/y plane
//!
//! Both reduce to a [`RenderRequest`]: display label to ordered points, plus a
//! suggested title and axis labels. Line styling is a hint for the sink only.

mod residual;
mod trajectory;

pub use residual::ResidualView;
pub use trajectory::TrajectoryView;

use serde::Serialize;

use crate::utils::{get_bounding_box, Extent};

/// Which analysis a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Nis,
    Tracks,
}

impl ViewKind {
    /// Prefix used for default output file names.
    pub fn file_prefix(self) -> &'static str {
        match self {
            ViewKind::Nis => "nis",
            ViewKind::Tracks => "tracks",
        }
    }
}

/// What a series represents, for sinks that style by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesRole {
    Truth,
    Estimate,
    Residual,
}

/// Rendering hint for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub role: SeriesRole,
    /// Line width in points.
    pub line_width: f32,
    /// 0 (invisible) to 1 (opaque).
    pub opacity: f32,
}

impl SeriesStyle {
    pub const TRUTH: SeriesStyle = SeriesStyle {
        role: SeriesRole::Truth,
        line_width: 2.0,
        opacity: 1.0,
    };

    pub const ESTIMATE: SeriesStyle = SeriesStyle {
        role: SeriesRole::Estimate,
        line_width: 1.2,
        opacity: 0.9,
    };

    pub const RESIDUAL: SeriesStyle = SeriesStyle {
        role: SeriesRole::Residual,
        line_width: 1.2,
        opacity: 1.0,
    };
}

/// One labelled line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub style: SeriesStyle,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, style: SeriesStyle, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            style,
            points,
        }
    }
}

/// Everything a rendering sink needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    pub kind: ViewKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Keep one data unit the same length on both axes.
    pub equal_aspect: bool,
    /// Series in drawing (and legend) order.
    pub series: Vec<Series>,
}

impl RenderRequest {
    pub fn new(
        kind: ViewKind,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            equal_aspect: false,
            series: Vec::new(),
        }
    }

    pub fn push(&mut self, series: Series) {
        self.series.push(series);
    }

    /// Look up a series by display label.
    pub fn get(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn total_points(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Bounds of every finite point in the request.
    pub fn extent(&self) -> Option<Extent> {
        get_bounding_box(self.series.iter().flat_map(|s| s.points.iter().copied()))
    }
}
