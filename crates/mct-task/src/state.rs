//! Progress record of a session.

use mct_core::{Interval, Point, Rect};
use serde::{Deserialize, Serialize};

use crate::taxonomy::Step;

/// Mutable progress of one exercise.
///
/// Only [`TaskSession`](crate::TaskSession) mutates it; collaborators get `&TaskState`.
/// Invariant: `points.len() == point_hits.len() + (0 if point_counted else 1)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    pub(crate) step: Step,
    pub(crate) int_x: Option<Interval>,
    pub(crate) int_y: Option<Interval>,
    pub(crate) points: Vec<Point>,
    pub(crate) point_hits: Vec<bool>,
    pub(crate) point_counted: bool,
    pub(crate) result: Option<f64>,
}

impl TaskState {
    pub(crate) fn new() -> Self {
        Self {
            step: Step::Start,
            int_x: None,
            int_y: None,
            points: Vec::new(),
            point_hits: Vec::new(),
            point_counted: true,
            result: None,
        }
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Accepted horizontal extent of the rectangle.
    pub fn int_x(&self) -> Option<Interval> {
        self.int_x
    }

    /// Accepted vertical extent of the rectangle.
    pub fn int_y(&self) -> Option<Interval> {
        self.int_y
    }

    /// The rectangle, once both extents are accepted.
    pub fn rectangle(&self) -> Option<Rect> {
        Some(Rect::new(self.int_x?, self.int_y?))
    }

    /// Every generated point, the pending one included.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Classification of each counted point (`true` = under the curve).
    pub fn point_hits(&self) -> &[bool] {
        &self.point_hits
    }

    /// `false` exactly when the last generated point awaits classification.
    pub fn point_counted(&self) -> bool {
        self.point_counted
    }

    /// The generated point awaiting classification.
    pub fn pending_point(&self) -> Option<Point> {
        if self.point_counted {
            None
        } else {
            self.points.last().copied()
        }
    }

    /// Accepted area estimate.
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    /// Number of counted points under the curve.
    pub fn hit_count(&self) -> usize {
        self.point_hits.iter().filter(|hit| **hit).count()
    }

    /// Number of counted points.
    pub fn counted_points(&self) -> usize {
        self.point_hits.len()
    }

    /// Quantities the area estimate is derived from, once a rectangle exists.
    pub fn integral_inputs(&self) -> Option<IntegralInputs> {
        let rect = self.rectangle()?;
        Some(IntegralInputs {
            area: rect.area(),
            hits: self.hit_count(),
            total: self.counted_points(),
            negative_correction: rect.x.width() * (-rect.y.start).max(0.0),
        })
    }
}

/// Derived inputs of the hit-or-miss area estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegralInputs {
    /// Rectangle area.
    pub area: f64,
    /// Counted points under the curve.
    pub hits: usize,
    /// Counted points.
    pub total: usize,
    /// Area of the rectangle part below the x-axis.
    pub negative_correction: f64,
}

impl IntegralInputs {
    /// Fraction of counted points under the curve (0 with no points).
    pub fn hit_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.hits as f64 / self.total as f64
        }
    }

    /// `area × hits / total − negative_correction`.
    pub fn estimate(&self) -> f64 {
        self.area * self.hit_ratio() - self.negative_correction
    }
}
