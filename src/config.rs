//! Run configuration.

use crate::nis::NisEvaluator;
use crate::{Error, Result};

/// Raster chart geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixels per inch, used to turn line widths in points into pixels.
    pub dpi: f32,
    /// Blank border around the plot area, in pixels.
    pub margin: u32,
}

impl Default for ChartConfig {
    /// 6.4 x 4.8 inches at 160 dpi.
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            dpi: 160.0,
            margin: 48,
        }
    }
}

impl ChartConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "chart size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.margin.saturating_mul(2) >= self.width.min(self.height) {
            return Err(Error::InvalidConfig(format!(
                "chart margin {} leaves no plot area in {}x{}",
                self.margin, self.width, self.height
            )));
        }
        if !self.dpi.is_finite() || self.dpi <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }
        Ok(())
    }

    /// Convert a line width in points to whole pixels (at least 1).
    pub fn line_width_px(&self, points: f32) -> u32 {
        ((points * self.dpi / 72.0).round() as u32).max(1)
    }
}

/// Settings for one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisConfig {
    pub evaluator: NisEvaluator,
    pub chart: ChartConfig,
    /// Replaces the view's default title.
    pub title: Option<String>,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        self.evaluator.validate()?;
        self.chart.validate()
    }

    /// The configured title, or `default` when none was given.
    pub fn title_or(&self, default: impl FnOnce() -> String) -> String {
        self.title.clone().unwrap_or_else(default)
    }
}
