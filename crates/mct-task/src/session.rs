//! The step-gated exercise state machine.

use std::fmt;

use chrono::Utc;
use mct_core::{Interval, Point, Rect};
use tracing::{debug, error, info, warn};

use crate::error::{Misuse, SessionError, TaskError};
use crate::numeric;
use crate::observer::{NoopObserver, SessionObserver};
use crate::policy::SessionPolicy;
use crate::state::TaskState;
use crate::stats::{CallArgs, TaskStats};
use crate::task::Task;
use crate::taxonomy::{Action, ErrorCode, Step};

/// Result of a session call: the recorded action, or why nothing changed.
pub type SessionResult = Result<Action, SessionError>;

/// One learner working through one [`Task`].
///
/// Every gated call is recorded in [`TaskStats`] under the step active when
/// it was made, whether it succeeds or fails validation. Misuse is returned
/// and logged, never recorded.
pub struct TaskSession {
    task: Task,
    policy: SessionPolicy,
    f_min: f64,
    f_max: f64,
    state: TaskState,
    stats: TaskStats,
    observer: Box<dyn SessionObserver>,
}

impl TaskSession {
    /// Creates a session with the default policy.
    pub fn new(task: Task) -> Self {
        Self::with_policy(task, SessionPolicy::default())
    }

    /// Creates a session with an explicit policy.
    pub fn with_policy(task: Task, policy: SessionPolicy) -> Self {
        let (f_min, f_max) = sample_bounds(&task, policy.resolution);
        let mut stats = TaskStats::default();
        stats.enter_step(Step::Start, Utc::now());
        debug!(task = %task, f_min, f_max, "session created");
        Self {
            task,
            policy,
            f_min,
            f_max,
            state: TaskState::new(),
            stats,
            observer: Box::new(NoopObserver),
        }
    }

    /// Replaces the observer notified after every record.
    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The exercise.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Tolerances in force.
    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Read-only progress snapshot.
    pub fn state(&self) -> &TaskState {
        &self.state
    }

    /// Read-only audit trail.
    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.state.step
    }

    /// Smallest sampled function value over the task interval.
    pub fn f_min(&self) -> f64 {
        self.f_min
    }

    /// Largest sampled function value over the task interval.
    pub fn f_max(&self) -> f64 {
        self.f_max
    }

    /// The session's tolerance check of a submission against a derived value.
    pub fn compare(&self, trying: f64, correct: f64) -> bool {
        numeric::compare(trying, correct, self.policy.accuracy)
    }

    /// Area estimate implied by the current rectangle and counted points.
    pub fn true_estimate(&self) -> Option<f64> {
        self.state.integral_inputs().map(|inputs| inputs.estimate())
    }

    /// Leaves START. Calling it twice is misuse.
    pub fn start(&mut self) -> SessionResult {
        if self.state.step != Step::Start {
            let since = self.stats.step_time(Step::Rect);
            return Err(self.misuse(Misuse::AlreadyStarted { since }));
        }
        self.next_step()
    }

    /// Jumps to END from any step. Calling it on a finished session is misuse.
    pub fn end(&mut self) -> SessionResult {
        if self.state.step == Step::End {
            let since = self.stats.step_time(Step::End);
            return Err(self.misuse(Misuse::AlreadyFinished { since }));
        }
        let from = self.state.step;
        self.advance(Step::End);
        let record = self.stats.append_action(Step::End, Action::END, CallArgs::None);
        self.observer.on_action(Step::End, record);
        info!(from = %from, "session ended");
        Ok(Action::END)
    }

    /// Completes the current step and advances exactly one step.
    pub fn next_step(&mut self) -> SessionResult {
        self.guarded(None, CallArgs::None, |session| {
            let state = &session.state;
            let mut err = TaskError::none();
            let (next, action) = match state.step {
                Step::Start => (Step::Rect, Action::START),
                Step::Rect => {
                    if state.int_x.is_none() {
                        err |= ErrorCode::X_0 | ErrorCode::X_1;
                    }
                    if state.int_y.is_none() {
                        err |= ErrorCode::Y_0 | ErrorCode::Y_1;
                    }
                    (Step::Points, Action::RECT_COMPLETE)
                }
                Step::Points => {
                    if !state.point_counted {
                        err |= ErrorCode::COMPLETE_BEFORE_COUNT;
                    }
                    if state.point_hits.len() < session.task.min_points() {
                        err |= ErrorCode::NOT_ENOUGH_POINTS;
                    }
                    (Step::Integral, Action::POINTS_COMPLETE)
                }
                // The statistical-error step is skipped.
                Step::Integral => {
                    if state.result.is_none() {
                        err |= ErrorCode::RESULT;
                    }
                    (Step::End, Action::INTEGRAL_COMPLETE | Action::END)
                }
                Step::Error => return Err(Misuse::StepNotImplemented(Step::Error).into()),
                Step::End => return Err(Misuse::TerminalStep(Step::End).into()),
            };
            err.into_result()?;
            session.advance(next);
            Ok(action)
        })
    }

    /// Submits the horizontal extent of the rectangle.
    ///
    /// Both bounds must equal the task interval exactly.
    pub fn set_int_x(&mut self, interval: impl Into<Interval>) -> SessionResult {
        let interval = interval.into();
        self.guarded(
            Some((Step::Rect, ErrorCode::RECT_WRONG_STEP)),
            CallArgs::Interval(interval),
            |session| {
                let expected = session.task.interval();
                let mut err = TaskError::none();
                if interval.start != expected.start {
                    err |= ErrorCode::X_0;
                }
                if interval.end != expected.end {
                    err |= ErrorCode::X_1;
                }
                err.into_result()?;
                session.state.int_x = Some(interval);
                Ok(Action::X_0 | Action::X_1)
            },
        )
    }

    /// Submits the vertical extent of the rectangle.
    ///
    /// The lower bound must lie in `[f_min - slack, f_min]`, the upper in
    /// `[f_max, f_max + slack]`, with `slack = y_accuracy × (f_max - f_min)`.
    pub fn set_int_y(&mut self, interval: impl Into<Interval>) -> SessionResult {
        let interval = interval.into();
        self.guarded(
            Some((Step::Rect, ErrorCode::RECT_WRONG_STEP)),
            CallArgs::Interval(interval),
            |session| {
                let (f_min, f_max) = (session.f_min, session.f_max);
                let slack = (f_max - f_min) * session.policy.y_accuracy;
                let mut err = TaskError::none();
                if !(f_min - slack <= interval.start && interval.start <= f_min) {
                    err |= ErrorCode::Y_0;
                }
                if !(f_max <= interval.end && interval.end <= f_max + slack) {
                    err |= ErrorCode::Y_1;
                }
                err.into_result()?;
                session.state.int_y = Some(interval);
                Ok(Action::Y_0 | Action::Y_1)
            },
        )
    }

    /// Adds a sample point inside the rectangle. The previous one must be classified.
    pub fn generate_point(&mut self, point: impl Into<Point>) -> SessionResult {
        let point = point.into();
        self.guarded(
            Some((Step::Points, ErrorCode::POINTS_WRONG_STEP)),
            CallArgs::Point(point),
            |session| {
                if !session.state.point_counted {
                    return Err(TaskError::new(ErrorCode::GENERATE_BEFORE_COUNT).into());
                }
                let rect = session.rectangle()?;
                if !rect.contains(point) {
                    return Err(TaskError::new(ErrorCode::POINT).into());
                }
                session.state.points.push(point);
                session.state.point_counted = false;
                Ok(Action::GENERATE)
            },
        )
    }

    /// Classifies the pending point; `hit` claims it lies under the curve.
    pub fn count_point(&mut self, hit: bool) -> SessionResult {
        self.guarded(
            Some((Step::Points, ErrorCode::POINTS_WRONG_STEP)),
            CallArgs::Hit(hit),
            |session| {
                let point = match session.state.pending_point() {
                    Some(point) => point,
                    None => return Err(TaskError::new(ErrorCode::COUNT_BEFORE_GENERATE).into()),
                };
                let actual = point.y <= session.task.f(point.x);
                if hit != actual {
                    let direction = if hit {
                        ErrorCode::COUNT_HIT
                    } else {
                        ErrorCode::COUNT_MISS
                    };
                    return Err(TaskError::new(ErrorCode::COUNT | direction).into());
                }
                session.state.point_hits.push(actual);
                session.state.point_counted = true;
                Ok(Action::COUNT)
            },
        )
    }

    /// Drops the pending point. Not recorded.
    pub fn discard_point(&mut self) -> Result<Point, SessionError> {
        let Some(point) = self.state.pending_point() else {
            return Err(self.misuse(Misuse::NothingToDiscard));
        };
        self.state.points.pop();
        self.state.point_counted = true;
        debug!(%point, "pending point discarded");
        Ok(point)
    }

    /// Submits the area estimate.
    pub fn set_result(&mut self, value: f64) -> SessionResult {
        self.guarded(
            Some((Step::Integral, ErrorCode::INTEGRAL_WRONG_STEP)),
            CallArgs::Value(value),
            |session| {
                let inputs = match session.state.integral_inputs() {
                    Some(inputs) => inputs,
                    None => return Err(Misuse::MissingRectangle(session.state.step).into()),
                };
                let expected = inputs.estimate();
                if !session.compare(value, expected) {
                    return Err(TaskError::new(ErrorCode::RESULT).into());
                }
                session.state.result = Some(value);
                Ok(Action::RESULT)
            },
        )
    }

    /// Runs `op` behind the step gate and records its outcome.
    fn guarded<F>(&mut self, gate: Option<(Step, ErrorCode)>, args: CallArgs, op: F) -> SessionResult
    where
        F: FnOnce(&mut Self) -> SessionResult,
    {
        let step = self.state.step;
        let outcome = match gate {
            Some((required, wrong_step)) if required != step => {
                Err(TaskError::new(wrong_step).into())
            }
            _ => op(self),
        };
        match &outcome {
            Ok(action) => {
                let record = self.stats.append_action(step, *action, args);
                debug!(step = %step, action = %action.label(), "action recorded");
                self.observer.on_action(step, record);
            }
            Err(SessionError::Task(err)) => {
                let record = self.stats.append_error(step, err.code(), args);
                warn!(step = %step, code = %err.code().label(), "validation failed");
                self.observer.on_error(step, record);
            }
            Err(SessionError::Misuse(misuse)) => {
                error!(step = %step, %misuse, "session misuse");
            }
        }
        outcome
    }

    fn misuse(&self, misuse: Misuse) -> SessionError {
        error!(step = %self.state.step, %misuse, "session misuse");
        misuse.into()
    }

    fn advance(&mut self, next: Step) {
        let from = self.state.step;
        if next != from {
            self.stats.enter_step(next, Utc::now());
        }
        self.state.step = next;
        info!(from = %from, to = %next, "step advanced");
    }

    fn rectangle(&self) -> Result<Rect, SessionError> {
        self.state
            .rectangle()
            .ok_or_else(|| Misuse::MissingRectangle(self.state.step).into())
    }
}

impl fmt::Debug for TaskSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSession")
            .field("task", &self.task)
            .field("policy", &self.policy)
            .field("f_min", &self.f_min)
            .field("f_max", &self.f_max)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Min and max of `f` at `resolution` evenly spaced points of the task interval.
///
/// The right end of the interval is not sampled. Non-finite values are skipped.
fn sample_bounds(task: &Task, resolution: usize) -> (f64, f64) {
    let interval = task.interval();
    let resolution = resolution.max(1);
    let mut bounds: Option<(f64, f64)> = None;
    let mut skipped = 0usize;
    for i in 0..resolution {
        let x = interval.start + interval.width() * (i as f64 / resolution as f64);
        let y = task.f(x);
        if !y.is_finite() {
            skipped += 1;
            continue;
        }
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(y), hi.max(y)),
            None => (y, y),
        });
    }
    if skipped > 0 {
        warn!(task = %task, skipped, resolution, "non-finite samples skipped");
    }
    bounds.unwrap_or((0.0, 0.0))
}
