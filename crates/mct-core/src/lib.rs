#![deny(missing_docs)]
#![doc = "Shared value types, error surface and deterministic helpers for the Monte-Carlo trainer."]

use std::fmt;

use ::serde::{Deserialize, Serialize};

pub mod errors;
pub mod hash;
pub mod rng;
pub mod serde;

pub use errors::{ErrorInfo, MctError};
pub use hash::stable_hash_string;
pub use rng::{derive_substream_seed, RngHandle};

/// Closed real interval `[start, end]`.
///
/// The type itself does not enforce ordering: a user submission may be
/// reversed or degenerate and still needs to be recorded as submitted.
/// Validated task intervals are built through the task constructor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound.
    pub start: f64,
    /// Upper bound.
    pub end: f64,
}

impl Interval {
    /// Creates an interval from its bounds.
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Returns `end - start`.
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Returns whether `value` lies within the inclusive bounds.
    pub fn contains(&self, value: f64) -> bool {
        self.start <= value && value <= self.end
    }

    /// Returns whether the interval has strictly positive width.
    pub fn is_proper(&self) -> bool {
        self.end > self.start
    }

    /// Returns the point at `fraction` of the way from `start` to `end`.
    pub fn lerp(&self, fraction: f64) -> f64 {
        self.start + self.width() * fraction
    }
}

impl From<(f64, f64)> for Interval {
    fn from((start, end): (f64, f64)) -> Self {
        Self::new(start, end)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A sampled point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle spanned by two intervals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal extent.
    pub x: Interval,
    /// Vertical extent.
    pub y: Interval,
}

impl Rect {
    /// Creates a rectangle from its horizontal and vertical extents.
    pub const fn new(x: Interval, y: Interval) -> Self {
        Self { x, y }
    }

    /// Returns the area of the rectangle.
    pub fn area(&self) -> f64 {
        self.x.width() * self.y.width()
    }

    /// Returns whether the point lies inside the rectangle (borders included).
    pub fn contains(&self, point: Point) -> bool {
        self.x.contains(point.x) && self.y.contains(point.y)
    }
}
