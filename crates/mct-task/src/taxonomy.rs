//! Steps of an exercise and the action/error vocabulary scoped to them.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Stage of the fixed exercise workflow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    /// Session created, nothing submitted yet.
    Start,
    /// Choosing the bounding rectangle.
    Rect,
    /// Generating and classifying sample points.
    Points,
    /// Submitting the area estimate.
    Integral,
    /// Statistical error submission. Present in the taxonomy, not reachable.
    Error,
    /// Exercise finished.
    End,
}

impl Step {
    /// Every step in workflow order.
    pub const ALL: [Step; 6] = [
        Step::Start,
        Step::Rect,
        Step::Points,
        Step::Integral,
        Step::Error,
        Step::End,
    ];

    /// Steps in which the learner submits values.
    pub const INTERACTIVE: [Step; 4] = [Step::Rect, Step::Points, Step::Integral, Step::Error];

    /// Returns whether the learner submits values in this step.
    pub fn is_interactive(self) -> bool {
        !matches!(self, Step::Start | Step::End)
    }

    /// Upper-case name used in logs and reports.
    pub fn name(self) -> &'static str {
        match self {
            Step::Start => "START",
            Step::Rect => "RECT",
            Step::Points => "POINTS",
            Step::Integral => "INTEGRAL",
            Step::Error => "ERROR",
            Step::End => "END",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of successfully performed operations.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Action: u32 {
        /// Session started.
        const START = 1 << 0;
        /// Left x bound accepted.
        const X_0 = 1 << 1;
        /// Right x bound accepted.
        const X_1 = 1 << 2;
        /// Lower y bound accepted.
        const Y_0 = 1 << 3;
        /// Upper y bound accepted.
        const Y_1 = 1 << 4;
        /// Rectangle stage completed.
        const RECT_COMPLETE = 1 << 5;
        /// Sample point generated.
        const GENERATE = 1 << 6;
        /// Sample point classified.
        const COUNT = 1 << 7;
        /// Point classified as over the curve.
        const COUNT_MISS = 1 << 8;
        /// Point classified as under the curve.
        const COUNT_HIT = 1 << 9;
        /// Point stage completed.
        const POINTS_COMPLETE = 1 << 10;
        /// Rectangle area submitted.
        const AREA = 1 << 11;
        /// Hit count submitted.
        const HIT = 1 << 12;
        /// Point count submitted.
        const POINTS = 1 << 13;
        /// Negative-area correction submitted.
        const NEGATIVE = 1 << 14;
        /// Area estimate accepted.
        const RESULT = 1 << 15;
        /// Integral stage completed.
        const INTEGRAL_COMPLETE = 1 << 16;
        /// Session finished.
        const END = 1 << 17;
    }
}

const ACTION_STEPS: [(Action, Step); 18] = [
    (Action::START, Step::Start),
    (Action::X_0, Step::Rect),
    (Action::X_1, Step::Rect),
    (Action::Y_0, Step::Rect),
    (Action::Y_1, Step::Rect),
    (Action::RECT_COMPLETE, Step::Rect),
    (Action::GENERATE, Step::Points),
    (Action::COUNT, Step::Points),
    (Action::COUNT_MISS, Step::Points),
    (Action::COUNT_HIT, Step::Points),
    (Action::POINTS_COMPLETE, Step::Points),
    (Action::AREA, Step::Integral),
    (Action::HIT, Step::Integral),
    (Action::POINTS, Step::Integral),
    (Action::NEGATIVE, Step::Integral),
    (Action::RESULT, Step::Integral),
    (Action::INTEGRAL_COMPLETE, Step::Integral),
    (Action::END, Step::End),
];

impl Action {
    /// Step the action belongs to, if every contained flag agrees on one.
    pub fn step(self) -> Option<Step> {
        single_step(self.steps())
    }

    /// Steps of the contained flags, in workflow order, deduplicated.
    pub fn steps(self) -> Vec<Step> {
        steps_of(ACTION_STEPS.iter().filter(|(flag, _)| self.contains(*flag)).map(|(_, s)| *s))
    }

    /// Every action flag belonging to `step`.
    pub fn for_step(step: Step) -> Action {
        ACTION_STEPS
            .iter()
            .filter(|(_, s)| *s == step)
            .fold(Action::empty(), |acc, (flag, _)| acc | *flag)
    }

    /// Names of the contained flags joined with `|`.
    pub fn label(self) -> String {
        join_names(self.iter_names().map(|(name, _)| name))
    }
}

bitflags! {
    /// Set of failed validations reported by a single call.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ErrorCode: u32 {
        /// Left x bound does not match the task interval.
        const X_0 = 1 << 0;
        /// Right x bound does not match the task interval.
        const X_1 = 1 << 1;
        /// Lower y bound outside the allowed slack below the function minimum.
        const Y_0 = 1 << 2;
        /// Upper y bound outside the allowed slack above the function maximum.
        const Y_1 = 1 << 3;
        /// Rectangle operation outside the rectangle step.
        const RECT_WRONG_STEP = 1 << 4;
        /// Classification requested with no pending point.
        const COUNT_BEFORE_GENERATE = 1 << 5;
        /// Generated point lies outside the rectangle.
        const POINT = 1 << 6;
        /// New point requested while the previous one is unclassified.
        const GENERATE_BEFORE_COUNT = 1 << 7;
        /// Stage completion requested while a point is unclassified.
        const COMPLETE_BEFORE_COUNT = 1 << 8;
        /// Wrong classification.
        const COUNT = 1 << 9;
        /// A hit was claimed as a miss.
        const COUNT_MISS = 1 << 10;
        /// A miss was claimed as a hit.
        const COUNT_HIT = 1 << 11;
        /// Fewer points classified than the task requires.
        const NOT_ENOUGH_POINTS = 1 << 12;
        /// Point operation outside the point step.
        const POINTS_WRONG_STEP = 1 << 13;
        /// Area estimate missing or outside tolerance.
        const RESULT = 1 << 14;
        /// Integral operation outside the integral step.
        const INTEGRAL_WRONG_STEP = 1 << 15;
    }
}

const ERROR_SCOPES: [(ErrorCode, Step, Action); 16] = [
    (ErrorCode::X_0, Step::Rect, Action::X_0),
    (ErrorCode::X_1, Step::Rect, Action::X_1),
    (ErrorCode::Y_0, Step::Rect, Action::Y_0),
    (ErrorCode::Y_1, Step::Rect, Action::Y_1),
    (ErrorCode::RECT_WRONG_STEP, Step::Rect, Action::empty()),
    (ErrorCode::COUNT_BEFORE_GENERATE, Step::Points, Action::COUNT),
    (ErrorCode::POINT, Step::Points, Action::GENERATE),
    (ErrorCode::GENERATE_BEFORE_COUNT, Step::Points, Action::GENERATE),
    (ErrorCode::COMPLETE_BEFORE_COUNT, Step::Points, Action::POINTS_COMPLETE),
    (ErrorCode::COUNT, Step::Points, Action::COUNT),
    (ErrorCode::COUNT_MISS, Step::Points, Action::COUNT_MISS),
    (ErrorCode::COUNT_HIT, Step::Points, Action::COUNT_HIT),
    (ErrorCode::NOT_ENOUGH_POINTS, Step::Points, Action::POINTS_COMPLETE),
    (ErrorCode::POINTS_WRONG_STEP, Step::Points, Action::empty()),
    (ErrorCode::RESULT, Step::Integral, Action::RESULT),
    (ErrorCode::INTEGRAL_WRONG_STEP, Step::Integral, Action::empty()),
];

impl ErrorCode {
    /// Step the error belongs to, if every contained flag agrees on one.
    pub fn step(self) -> Option<Step> {
        single_step(self.steps())
    }

    /// Steps of the contained flags, in workflow order, deduplicated.
    pub fn steps(self) -> Vec<Step> {
        steps_of(
            ERROR_SCOPES
                .iter()
                .filter(|(flag, _, _)| self.contains(*flag))
                .map(|(_, s, _)| *s),
        )
    }

    /// Actions whose failure the contained flags describe.
    pub fn actions(self) -> Action {
        ERROR_SCOPES
            .iter()
            .filter(|(flag, _, _)| self.contains(*flag))
            .fold(Action::empty(), |acc, (_, _, action)| acc | *action)
    }

    /// Every error flag belonging to `step`.
    pub fn for_step(step: Step) -> ErrorCode {
        ERROR_SCOPES
            .iter()
            .filter(|(_, s, _)| *s == step)
            .fold(ErrorCode::empty(), |acc, (flag, _, _)| acc | *flag)
    }

    /// The wrong-step flag of `step`, if the step has gated operations.
    pub fn wrong_step(step: Step) -> Option<ErrorCode> {
        match step {
            Step::Rect => Some(ErrorCode::RECT_WRONG_STEP),
            Step::Points => Some(ErrorCode::POINTS_WRONG_STEP),
            Step::Integral => Some(ErrorCode::INTEGRAL_WRONG_STEP),
            _ => None,
        }
    }

    /// Names of the contained flags joined with `|`.
    pub fn label(self) -> String {
        join_names(self.iter_names().map(|(name, _)| name))
    }
}

fn steps_of(steps: impl Iterator<Item = Step>) -> Vec<Step> {
    let mut out: Vec<Step> = steps.collect();
    out.sort();
    out.dedup();
    out
}

fn single_step(steps: Vec<Step>) -> Option<Step> {
    match steps.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names.collect::<Vec<_>>().join(" | ");
    if joined.is_empty() {
        "(none)".to_string()
    } else {
        joined
    }
}
