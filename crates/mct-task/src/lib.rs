#![deny(missing_docs)]
#![doc = "Monte-Carlo integration exercises: task description, step-gated session and audit trail."]

/// Task construction errors, validation error sets and misuse.
pub mod error;
/// Error function and Laplace table helpers.
pub mod laplace;
/// Tolerance comparison and significant-digit helpers.
pub mod numeric;
/// Hook notified of every recorded call.
pub mod observer;
/// Session tolerances and task defaults.
pub mod policy;
/// Session snapshots and progress summaries.
pub mod report;
/// The exercise state machine.
pub mod session;
/// Session progress.
pub mod state;
/// Session audit trail.
pub mod stats;
/// Immutable exercise description.
pub mod task;
/// Steps, actions and error codes.
pub mod taxonomy;

pub use error::{Misuse, SessionError, TaskBuildError, TaskError};
pub use laplace::{laplace, laplace_inverse, required_points, z_score, LaplaceTable};
pub use observer::{NoopObserver, SessionObserver};
pub use policy::{load_policy, SessionPolicy, TaskDefaults};
pub use report::{SessionReport, StatsSummary, StepSummary};
pub use session::{SessionResult, TaskSession};
pub use state::{IntegralInputs, TaskState};
pub use stats::{ActionRecord, CallArgs, ErrorRecord, TaskStats};
pub use task::{Task, TaskSpec};
pub use taxonomy::{Action, ErrorCode, Step};
