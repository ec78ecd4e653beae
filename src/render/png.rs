//! PNG line-chart sink.
//!
//! Draws every series of a request as a polyline over a white canvas, with a
//! frame, tick marks and a legend of colour swatches in legend order. No text
//! is rasterised; use the JSON sink when titles and labels are needed.

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use tracing::debug;

use super::RenderSink;
use crate::config::ChartConfig;
use crate::utils::{clamp, Extent};
use crate::views::{RenderRequest, Series};
use crate::Result;

/// Series colours, cycled in legend order.
pub const PALETTE: [[u8; 3]; 10] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [127, 127, 127],
    [188, 189, 34],
    [23, 190, 207],
];

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const LEGEND_BORDER: Rgb<u8> = Rgb([204, 204, 204]);

/// Fraction of the data span added around the data.
const DATA_PADDING: f64 = 0.05;
const TICK_COUNT: u32 = 5;
const TICK_LENGTH: f32 = 5.0;
const SWATCH_WIDTH: u32 = 24;
const LEGEND_ROW: u32 = 14;

/// Writes a render request as a PNG line chart.
pub struct PngChartSink {
    path: PathBuf,
    chart: ChartConfig,
}

impl PngChartSink {
    pub fn new<P: AsRef<Path>>(path: P, chart: ChartConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            chart,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rasterise `request` without writing it anywhere.
    pub fn draw(&self, request: &RenderRequest) -> RgbImage {
        let chart = &self.chart;
        let mut image = RgbImage::from_pixel(chart.width, chart.height, BACKGROUND);
        let frame = PlotFrame::new(request, chart);

        for (index, series) in request.series.iter().enumerate() {
            let color = series_color(index, series);
            let width = chart.line_width_px(series.style.line_width);
            draw_series(&mut image, &frame, series, color, width);
        }

        draw_axes(&mut image, &frame);
        draw_legend(&mut image, &frame, request, chart);
        image
    }
}

impl RenderSink for PngChartSink {
    fn render(&mut self, request: &RenderRequest) -> Result<()> {
        self.chart.validate()?;
        let image = self.draw(request);
        image.save_with_format(&self.path, ImageFormat::Png)?;
        debug!(
            path = %self.path.display(),
            series = request.series.len(),
            points = request.total_points(),
            "rendered png chart"
        );
        Ok(())
    }
}

/// Plot area in pixels and the data extent mapped onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlotFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub extent: Extent,
}

impl PlotFrame {
    pub(crate) fn new(request: &RenderRequest, chart: &ChartConfig) -> Self {
        let margin = chart.margin as f64;
        let width = chart.width as f64 - 2.0 * margin;
        let height = chart.height as f64 - 2.0 * margin;

        let extent = request
            .extent()
            .unwrap_or(Extent {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 1.0,
                max_y: 1.0,
            })
            .padded(DATA_PADDING);
        let extent = if request.equal_aspect {
            extent.with_equal_aspect(width, height)
        } else {
            extent
        };

        Self {
            left: margin,
            top: margin,
            width,
            height,
            extent,
        }
    }

    pub(crate) fn to_pixel(&self, (x, y): (f64, f64)) -> (f32, f32) {
        let e = &self.extent;
        let px = self.left + (x - e.min_x) / e.width() * self.width;
        let py = self.top + self.height - (y - e.min_y) / e.height() * self.height;
        (px as f32, py as f32)
    }
}

fn series_color(index: usize, series: &Series) -> Rgb<u8> {
    let base = PALETTE[index % PALETTE.len()];
    let alpha = clamp(series.style.opacity, 0.0, 1.0);
    Rgb(blend(base, BACKGROUND.0, alpha))
}

/// Mix `color` over `background` with opacity `alpha`.
fn blend(color: [u8; 3], background: [u8; 3], alpha: f32) -> [u8; 3] {
    let mut out = [0u8; 3];
    for c in 0..3 {
        let v = color[c] as f32 * alpha + background[c] as f32 * (1.0 - alpha);
        out[c] = v.round() as u8;
    }
    out
}

fn draw_series(image: &mut RgbImage, frame: &PlotFrame, series: &Series, color: Rgb<u8>, width: u32) {
    let finite = |p: &(f64, f64)| p.0.is_finite() && p.1.is_finite();

    if series.points.len() == 1 && finite(&series.points[0]) {
        let (x, y) = frame.to_pixel(series.points[0]);
        let size = width.max(3);
        let half = (size / 2) as i32;
        let rect = Rect::at(x.round() as i32 - half, y.round() as i32 - half).of_size(size, size);
        draw_filled_rect_mut(image, rect, color);
        return;
    }

    // A non-finite point breaks the line rather than joining across it.
    for pair in series.points.windows(2) {
        if !(finite(&pair[0]) && finite(&pair[1])) {
            continue;
        }
        let start = frame.to_pixel(pair[0]);
        let end = frame.to_pixel(pair[1]);
        draw_thick_segment(image, start, end, color, width);
    }
}

fn draw_thick_segment(
    image: &mut RgbImage,
    start: (f32, f32),
    end: (f32, f32),
    color: Rgb<u8>,
    width: u32,
) {
    let lo = -((width as i32 - 1) / 2);
    let hi = lo + width as i32 - 1;
    for offset in lo..=hi {
        let o = offset as f32;
        draw_line_segment_mut(image, (start.0, start.1 + o), (end.0, end.1 + o), color);
        draw_line_segment_mut(image, (start.0 + o, start.1), (end.0 + o, end.1), color);
    }
}

fn draw_axes(image: &mut RgbImage, frame: &PlotFrame) {
    let rect = Rect::at(frame.left as i32, frame.top as i32)
        .of_size(frame.width.round() as u32, frame.height.round() as u32);
    draw_hollow_rect_mut(image, rect, AXIS);

    let left = frame.left as f32;
    let top = frame.top as f32;
    let right = (frame.left + frame.width) as f32;
    let bottom = (frame.top + frame.height) as f32;
    for i in 0..=TICK_COUNT {
        let t = i as f32 / TICK_COUNT as f32;
        let x = left + t * (right - left);
        let y = bottom - t * (bottom - top);
        draw_line_segment_mut(image, (x, bottom), (x, bottom + TICK_LENGTH), AXIS);
        draw_line_segment_mut(image, (left - TICK_LENGTH, y), (left, y), AXIS);
    }
}

fn draw_legend(image: &mut RgbImage, frame: &PlotFrame, request: &RenderRequest, chart: &ChartConfig) {
    if request.series.is_empty() {
        return;
    }
    let rows = request.series.len() as u32;
    let box_width = SWATCH_WIDTH + 12;
    let box_height = rows * LEGEND_ROW + 6;
    let right = (frame.left + frame.width) as i32;
    let box_x = right - box_width as i32 - 8;
    let box_y = frame.top as i32 + 8;

    draw_filled_rect_mut(
        image,
        Rect::at(box_x, box_y).of_size(box_width, box_height),
        BACKGROUND,
    );
    draw_hollow_rect_mut(
        image,
        Rect::at(box_x, box_y).of_size(box_width, box_height),
        LEGEND_BORDER,
    );

    for (index, series) in request.series.iter().enumerate() {
        let color = series_color(index, series);
        let thickness = chart.line_width_px(series.style.line_width);
        let row_center = box_y + 3 + (index as u32 * LEGEND_ROW + LEGEND_ROW / 2) as i32;
        let rect = Rect::at(box_x + 6, row_center - (thickness / 2) as i32)
            .of_size(SWATCH_WIDTH, thickness);
        draw_filled_rect_mut(image, rect, color);
    }
}
