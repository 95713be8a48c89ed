//! Immutable exercise description.

use std::fmt;
use std::sync::Arc;

use mct_core::Interval;
use mct_expr::{Function, DEFAULT_VARIABLE};
use serde::{Deserialize, Serialize};

use crate::error::TaskBuildError;

type RealFn = dyn Fn(f64) -> f64 + Send + Sync;

/// One integration exercise: a function on an interval plus trainer parameters.
///
/// Cheap to clone; the wrapped function is shared.
#[derive(Clone)]
pub struct Task {
    f: Arc<RealFn>,
    source: String,
    variable: String,
    function_display: String,
    integral_display: String,
    interval: Interval,
    min_points: usize,
    target_error: f64,
    confidence: f64,
}

impl Task {
    /// Parses `expression` and builds a task over `interval`.
    pub fn new(
        expression: &str,
        interval: impl Into<Interval>,
        min_points: usize,
        target_error: f64,
        confidence: f64,
    ) -> Result<Self, TaskBuildError> {
        let function = Function::parse(expression)?;
        let display = function.to_string();
        let variable = function.variable().to_string();
        let f = move |x: f64| function.eval(x);
        Self::build(
            Arc::new(f),
            expression.to_string(),
            variable,
            display,
            interval.into(),
            min_points,
            target_error,
            confidence,
        )
    }

    /// Builds a task around an already-callable function and its rendering.
    pub fn from_fn<F>(
        f: F,
        display: impl Into<String>,
        interval: impl Into<Interval>,
        min_points: usize,
        target_error: f64,
        confidence: f64,
    ) -> Result<Self, TaskBuildError>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let display = display.into();
        Self::build(
            Arc::new(f),
            display.clone(),
            DEFAULT_VARIABLE.to_string(),
            display,
            interval.into(),
            min_points,
            target_error,
            confidence,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn build(
        f: Arc<RealFn>,
        source: String,
        variable: String,
        function_display: String,
        interval: Interval,
        min_points: usize,
        target_error: f64,
        confidence: f64,
    ) -> Result<Self, TaskBuildError> {
        if !(interval.start.is_finite() && interval.end.is_finite() && interval.is_proper()) {
            return Err(TaskBuildError::InvalidInterval {
                start: interval.start,
                end: interval.end,
            });
        }
        if min_points == 0 {
            return Err(TaskBuildError::InvalidParameter {
                name: "min_points",
                reason: "must be positive".to_string(),
            });
        }
        if !(target_error.is_finite() && target_error > 0.0) {
            return Err(TaskBuildError::InvalidParameter {
                name: "target_error",
                reason: format!("must be positive, got {target_error}"),
            });
        }
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(TaskBuildError::InvalidParameter {
                name: "confidence",
                reason: format!("must lie in (0, 1), got {confidence}"),
            });
        }
        let integral_display = format!(
            "∫[{}, {}] ({}) d{}",
            interval.start, interval.end, function_display, variable
        );
        Ok(Self {
            f,
            source,
            variable,
            function_display,
            integral_display,
            interval,
            min_points,
            target_error,
            confidence,
        })
    }

    /// Evaluates the function.
    pub fn f(&self, x: f64) -> f64 {
        (self.f)(x)
    }

    /// Source text the task was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Human-readable rendering of the function.
    pub fn function_display(&self) -> &str {
        &self.function_display
    }

    /// Human-readable rendering of the definite integral.
    pub fn integral_display(&self) -> &str {
        &self.integral_display
    }

    /// Integration interval.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Minimum number of classified points before the point step may complete.
    pub fn min_points(&self) -> usize {
        self.min_points
    }

    /// Error bound of the exercise.
    pub fn target_error(&self) -> f64 {
        self.target_error
    }

    /// Confidence level of the exercise.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Serializable description of the task.
    pub fn spec(&self) -> TaskSpec {
        TaskSpec {
            expression: self.source.clone(),
            variable: self.variable.clone(),
            function_display: self.function_display.clone(),
            integral_display: self.integral_display.clone(),
            interval: self.interval,
            min_points: self.min_points,
            target_error: self.target_error,
            confidence: self.confidence,
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("function", &self.function_display)
            .field("interval", &self.interval)
            .field("min_points", &self.min_points)
            .field("target_error", &self.target_error)
            .field("confidence", &self.confidence)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.integral_display)
    }
}

/// Plain-data description of a [`Task`], used in reports and hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Source text.
    pub expression: String,
    /// Bound variable name.
    pub variable: String,
    /// Rendering of the function.
    pub function_display: String,
    /// Rendering of the definite integral.
    pub integral_display: String,
    /// Integration interval.
    pub interval: Interval,
    /// Minimum classified points.
    pub min_points: usize,
    /// Error bound.
    pub target_error: f64,
    /// Confidence level.
    pub confidence: f64,
}
