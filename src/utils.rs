//! Utility functions for trackdiag.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::OnceLock;

/// Global set of warned messages (for warn_once).
static WARNED_MESSAGES: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

/// Log a warning only once per process.
///
/// Subsequent calls with the same message are ignored.
pub fn warn_once(message: &str) {
    let warned = WARNED_MESSAGES.get_or_init(|| Mutex::new(HashSet::new()));
    let mut guard = match warned.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if guard.insert(message.to_string()) {
        tracing::warn!("{}", message);
    }
}

/// Axis-aligned bounds of a set of 2-D points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow each side by `fraction` of the span. Zero-width spans are
    /// widened by `0.5` on each side so the result is never degenerate.
    pub fn padded(&self, fraction: f64) -> Self {
        let (min_x, max_x) = pad_span(self.min_x, self.max_x, fraction);
        let (min_y, max_y) = pad_span(self.min_y, self.max_y, fraction);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Widen the shorter span (about its centre) so one data unit maps to the
    /// same number of pixels on both axes of a `pixel_width x pixel_height`
    /// area.
    pub fn with_equal_aspect(&self, pixel_width: f64, pixel_height: f64) -> Self {
        let scale = (self.width() / pixel_width).max(self.height() / pixel_height);
        let half_w = scale * pixel_width / 2.0;
        let half_h = scale * pixel_height / 2.0;
        let cx = (self.min_x + self.max_x) / 2.0;
        let cy = (self.min_y + self.max_y) / 2.0;
        Self {
            min_x: cx - half_w,
            min_y: cy - half_h,
            max_x: cx + half_w,
            max_y: cy + half_h,
        }
    }
}

fn pad_span(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let span = max - min;
    if span > 0.0 {
        (min - span * fraction, max + span * fraction)
    } else {
        (min - 0.5, max + 0.5)
    }
}

/// Bounding box of the finite points, or `None` if there are none.
pub fn get_bounding_box<I>(points: I) -> Option<Extent>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    points
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .fold(None, |acc: Option<Extent>, (x, y)| {
            Some(match acc {
                None => Extent {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                },
                Some(e) => Extent {
                    min_x: e.min_x.min(x),
                    min_y: e.min_y.min(y),
                    max_x: e.max_x.max(x),
                    max_y: e.max_y.max(y),
                },
            })
        })
}

/// Clamp a value to a range.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
