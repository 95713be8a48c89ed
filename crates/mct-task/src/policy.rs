//! Session tolerances and task defaults loaded from YAML.

use std::fs;
use std::path::Path;

use mct_core::errors::{ErrorInfo, MctError};
use mct_core::serde::from_yaml_slice;
use serde::{Deserialize, Serialize};

/// Parameters filled in when a batch record omits them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TaskDefaults {
    /// Minimum number of classified points.
    #[serde(default = "TaskDefaults::default_min_points")]
    pub min_points: usize,
    /// Error bound of the exercise.
    #[serde(default = "TaskDefaults::default_target_error")]
    pub target_error: f64,
    /// Confidence level of the exercise.
    #[serde(default = "TaskDefaults::default_confidence")]
    pub confidence: f64,
}

impl TaskDefaults {
    const fn default_min_points() -> usize {
        10
    }

    const fn default_target_error() -> f64 {
        0.05
    }

    const fn default_confidence() -> f64 {
        0.95
    }
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            min_points: Self::default_min_points(),
            target_error: Self::default_target_error(),
            confidence: Self::default_confidence(),
        }
    }
}

/// Tolerances and sampling parameters of a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SessionPolicy {
    /// Relative tolerance applied to numeric submissions.
    #[serde(default = "SessionPolicy::default_accuracy")]
    pub accuracy: f64,
    /// Slack of the y bounds, as a fraction of `f_max - f_min`.
    #[serde(default = "SessionPolicy::default_y_accuracy")]
    pub y_accuracy: f64,
    /// Number of evenly spaced samples used to bound the function.
    #[serde(default = "SessionPolicy::default_resolution")]
    pub resolution: usize,
    /// Parameters for batch records that omit them.
    #[serde(default)]
    pub defaults: TaskDefaults,
}

impl SessionPolicy {
    const fn default_accuracy() -> f64 {
        0.01
    }

    const fn default_y_accuracy() -> f64 {
        0.1
    }

    const fn default_resolution() -> usize {
        1000
    }

    /// Rejects tolerances and counts that would make every check meaningless.
    pub fn validate(&self) -> Result<(), MctError> {
        let invalid = |field: &str, reason: &str| {
            Err(MctError::Config(
                ErrorInfo::new("policy_invalid", format!("{field} {reason}"))
                    .with_context("field", field),
            ))
        };
        if !(self.accuracy.is_finite() && self.accuracy >= 0.0) {
            return invalid("accuracy", "must be a non-negative number");
        }
        if !(self.y_accuracy.is_finite() && self.y_accuracy >= 0.0) {
            return invalid("y_accuracy", "must be a non-negative number");
        }
        if self.resolution == 0 {
            return invalid("resolution", "must be positive");
        }
        if self.defaults.min_points == 0 {
            return invalid("defaults.min_points", "must be positive");
        }
        if !(self.defaults.target_error.is_finite() && self.defaults.target_error > 0.0) {
            return invalid("defaults.target_error", "must be positive");
        }
        if !(self.defaults.confidence > 0.0 && self.defaults.confidence < 1.0) {
            return invalid("defaults.confidence", "must lie in (0, 1)");
        }
        Ok(())
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            accuracy: Self::default_accuracy(),
            y_accuracy: Self::default_y_accuracy(),
            resolution: Self::default_resolution(),
            defaults: TaskDefaults::default(),
        }
    }
}

/// Loads and validates a session policy from the provided YAML path.
pub fn load_policy<P: AsRef<Path>>(path: P) -> Result<SessionPolicy, MctError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| MctError::io("policy_read", path, err))?;
    let policy: SessionPolicy = from_yaml_slice(&bytes)?;
    policy.validate()?;
    Ok(policy)
}
