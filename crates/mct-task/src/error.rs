//! Error types of task construction and session operations.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use chrono::{DateTime, Utc};
use mct_core::errors::{ErrorInfo, MctError};
use mct_expr::{ExprError, ParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::taxonomy::{Action, ErrorCode, Step};

/// Failure to build a [`Task`](crate::Task). No partial task is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskBuildError {
    /// The function expression did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The expression mentions more than one free variable.
    #[error("too many variables ({}) in \"{expression}\"", .variables.join(", "))]
    TooManyVariables {
        /// Source text.
        expression: String,
        /// Free variables found, sorted.
        variables: Vec<String>,
    },
    /// The interval is empty, reversed or not finite.
    #[error("invalid interval [{start}, {end}]: end must be finite and greater than start")]
    InvalidInterval {
        /// Submitted start.
        start: f64,
        /// Submitted end.
        end: f64,
    },
    /// A trainer parameter is out of range.
    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl From<ExprError> for TaskBuildError {
    fn from(err: ExprError) -> Self {
        match err {
            ExprError::Parse(parse) => TaskBuildError::Parse(parse),
            ExprError::TooManyVariables {
                expression,
                variables,
            } => TaskBuildError::TooManyVariables {
                expression,
                variables,
            },
        }
    }
}

impl From<TaskBuildError> for MctError {
    fn from(err: TaskBuildError) -> Self {
        let code = match &err {
            TaskBuildError::Parse(_) => "task.parse",
            TaskBuildError::TooManyVariables { .. } => "task.too_many_variables",
            TaskBuildError::InvalidInterval { .. } => "task.invalid_interval",
            TaskBuildError::InvalidParameter { .. } => "task.invalid_parameter",
        };
        MctError::Task(ErrorInfo::new(code, err.to_string()))
    }
}

/// Composable set of failed validations.
///
/// Empty means "no error"; a call only fails when the set is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskError {
    code: ErrorCode,
}

impl TaskError {
    /// Creates an error holding `code`.
    pub fn new(code: ErrorCode) -> Self {
        Self { code }
    }

    /// Creates an empty error set.
    pub fn none() -> Self {
        Self::new(ErrorCode::empty())
    }

    /// Contained flags.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns whether no validation failed.
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Returns whether every flag of `code` is set.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.code.contains(code)
    }

    /// Actions whose failure this error describes.
    pub fn actions(&self) -> Action {
        self.code.actions()
    }

    /// `Err(self)` when non-empty.
    pub fn into_result(self) -> Result<(), TaskError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Default for TaskError {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {}", self.code.label())
    }
}

impl std::error::Error for TaskError {}

impl From<ErrorCode> for TaskError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

impl BitOrAssign<ErrorCode> for TaskError {
    fn bitor_assign(&mut self, rhs: ErrorCode) {
        self.code |= rhs;
    }
}

impl BitOrAssign for TaskError {
    fn bitor_assign(&mut self, rhs: TaskError) {
        self.code |= rhs.code;
    }
}

impl BitOr<ErrorCode> for TaskError {
    type Output = TaskError;

    fn bitor(self, rhs: ErrorCode) -> TaskError {
        TaskError::new(self.code | rhs)
    }
}

/// Calls the presentation layer must never make.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Misuse {
    /// `start` after the session already left START.
    #[error("session already started (at {})", fmt_time(.since))]
    AlreadyStarted {
        /// When the session left START, if recorded.
        since: Option<DateTime<Utc>>,
    },
    /// `end` on a finished session.
    #[error("session already finished (at {})", fmt_time(.since))]
    AlreadyFinished {
        /// When the session entered END, if recorded.
        since: Option<DateTime<Utc>>,
    },
    /// `discard_point` with no pending point.
    #[error("no unclassified point to discard")]
    NothingToDiscard,
    /// Advancing from a step that has no completing operation.
    #[error("step {0} is not implemented")]
    StepNotImplemented(Step),
    /// Advancing from the final step.
    #[error("cannot advance from step {0}")]
    TerminalStep(Step),
    /// A rectangle was required but the state has none.
    #[error("rectangle is not set in step {0}")]
    MissingRectangle(Step),
}

fn fmt_time(time: &Option<DateTime<Utc>>) -> String {
    time.map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "unknown time".to_string())
}

/// Outcome of a failed session call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Recoverable validation failure. The call was recorded and state is unchanged.
    #[error(transparent)]
    Task(#[from] TaskError),
    /// Programmer misuse. Not recorded.
    #[error("session misuse: {0}")]
    Misuse(#[from] Misuse),
}

impl SessionError {
    /// Validation flags, if this is a validation failure.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            SessionError::Task(err) => Some(err.code()),
            SessionError::Misuse(_) => None,
        }
    }

    /// Returns whether this is a validation failure containing every flag of `code`.
    pub fn contains(&self, code: ErrorCode) -> bool {
        self.code().is_some_and(|own| own.contains(code))
    }

    /// Returns whether this is programmer misuse.
    pub fn is_misuse(&self) -> bool {
        matches!(self, SessionError::Misuse(_))
    }
}
