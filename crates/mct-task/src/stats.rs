//! Append-only audit trail of a session.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mct_core::{Interval, Point};
use serde::{Deserialize, Serialize};

use crate::taxonomy::{Action, ErrorCode, Step};

/// Arguments of a recorded call, kept as submitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CallArgs {
    /// Call without arguments.
    None,
    /// A submitted interval.
    Interval(Interval),
    /// A submitted point.
    Point(Point),
    /// A submitted hit/miss claim.
    Hit(bool),
    /// A submitted number.
    Value(f64),
}

/// A successful call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// What was done.
    pub action: Action,
    /// When it was recorded.
    pub time: DateTime<Utc>,
    /// Arguments as submitted.
    pub args: CallArgs,
}

/// A failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Which validations failed.
    pub code: ErrorCode,
    /// When it was recorded.
    pub time: DateTime<Utc>,
    /// Arguments as submitted.
    pub args: CallArgs,
}

/// Per-step log of actions and errors, plus first-entry times of each step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskStats {
    step_time: BTreeMap<Step, DateTime<Utc>>,
    actions: BTreeMap<Step, Vec<ActionRecord>>,
    errors: BTreeMap<Step, Vec<ErrorRecord>>,
}

impl TaskStats {
    pub(crate) fn enter_step(&mut self, step: Step, time: DateTime<Utc>) {
        self.step_time.entry(step).or_insert(time);
    }

    pub(crate) fn append_action(
        &mut self,
        step: Step,
        action: Action,
        args: CallArgs,
    ) -> &ActionRecord {
        let records = self.actions.entry(step).or_default();
        records.push(ActionRecord {
            action,
            time: Utc::now(),
            args,
        });
        &records[records.len() - 1]
    }

    pub(crate) fn append_error(
        &mut self,
        step: Step,
        code: ErrorCode,
        args: CallArgs,
    ) -> &ErrorRecord {
        let records = self.errors.entry(step).or_default();
        records.push(ErrorRecord {
            code,
            time: Utc::now(),
            args,
        });
        &records[records.len() - 1]
    }

    /// When `step` was first entered.
    pub fn step_time(&self, step: Step) -> Option<DateTime<Utc>> {
        self.step_time.get(&step).copied()
    }

    /// Actions recorded while `step` was active.
    pub fn actions(&self, step: Step) -> &[ActionRecord] {
        self.actions.get(&step).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Errors recorded while `step` was active.
    pub fn errors(&self, step: Step) -> &[ErrorRecord] {
        self.errors.get(&step).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of recorded actions across all steps.
    pub fn action_count(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    /// Number of recorded errors across all steps.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Number of records of either kind across all steps.
    pub fn record_count(&self) -> usize {
        self.action_count() + self.error_count()
    }
}
