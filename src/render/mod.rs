//! Rendering sinks.
//!
//! A sink takes a finished [`RenderRequest`] and produces an artifact. The
//! analysis core never depends on a particular sink.
//!
//! - `PngChartSink` - raster line chart (image + imageproc)
//! - `JsonSink` - the request itself as JSON, including all text

mod json;
mod png;

pub use json::JsonSink;
pub use png::{PngChartSink, PALETTE};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::config::ChartConfig;
use crate::views::RenderRequest;
use crate::Result;

/// Something that can draw a render request.
pub trait RenderSink {
    fn render(&mut self, request: &RenderRequest) -> Result<()>;
}

/// Artifact format for the built-in sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}' (expected png or json)", other)),
        }
    }
}

/// Build the sink for `format` writing to `path`.
pub fn sink_for<P: AsRef<Path>>(
    format: OutputFormat,
    path: P,
    chart: &ChartConfig,
) -> Box<dyn RenderSink> {
    match format {
        OutputFormat::Png => Box::new(PngChartSink::new(path, *chart)),
        OutputFormat::Json => Box::new(JsonSink::new(path)),
    }
}
