//! Sample-to-pixel rasterization.
//!
//! Maps any number of samples onto any canvas width with an accumulator
//! instead of a resampling filter: each sample adds one to a threshold and
//! the column cursor advances whenever the threshold has covered another
//! `samples / width` worth of input. Works the same when stretching (fewer
//! samples than columns) and when squeezing thousands of samples per column.
//!
//! Samples sharing a column are drawn in sample order; no per-column
//! min/max envelope is built.

use super::range::ValueRange;

/// A pixel coordinate. `x` grows to the right, `y` grows with sample value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    /// Where the first segment of every polyline starts.
    pub const ORIGIN: Point = Point { x: 0, y: 0 };
}

/// The rendered waveform: one point per input sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub width: u32,
    pub height: u32,
}

impl Polyline {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Line segments in drawing order, the first one leaving [`Point::ORIGIN`].
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        std::iter::once(Point::ORIGIN)
            .chain(self.points.iter().copied())
            .zip(self.points.iter().copied())
    }

    /// Right-most column reached.
    pub fn max_x(&self) -> Option<u32> {
        self.points.iter().map(|p| p.x).max()
    }
}

/// Rasterizes `samples` onto a `width` x `height` pixel grid.
///
/// The minimum value lands on row 0 and larger samples on larger rows, so on
/// a screen-down surface the trace is drawn with the minimum at the top.
/// A constant signal maps every sample to row 0. A zero-sized canvas yields
/// an empty polyline.
pub fn rasterize(samples: &[i64], range: ValueRange, width: u32, height: u32) -> Polyline {
    if width == 0 || height == 0 {
        return Polyline {
            points: Vec::new(),
            width,
            height,
        };
    }

    let width_ratio = samples.len() as f64 / f64::from(width);
    let height_ratio = range.span() as f64 / f64::from(height);

    let mut points = Vec::with_capacity(samples.len());
    let mut threshold = 0.0f64;
    let mut x: u32 = 0;

    for &sample in samples {
        while threshold >= width_ratio {
            threshold -= width_ratio;
            x += 1;
        }

        let y = if height_ratio > 0.0 {
            (sample.abs_diff(range.min) as f64 / height_ratio).floor() as u32
        } else {
            0
        };

        points.push(Point {
            x: x.min(width),
            y: y.min(height),
        });

        threshold += 1.0;
    }

    Polyline {
        points,
        width,
        height,
    }
}
