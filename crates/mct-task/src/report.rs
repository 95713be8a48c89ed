//! Serializable snapshots of a session for display and audit export.

use mct_core::errors::MctError;
use mct_core::stable_hash_string;
use serde::{Deserialize, Serialize};

use crate::session::TaskSession;
use crate::state::{IntegralInputs, TaskState};
use crate::stats::TaskStats;
use crate::task::TaskSpec;
use crate::taxonomy::Step;

/// Progress indicators of one interactive step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSummary {
    /// Step described.
    pub step: Step,
    /// Whether the session is in this step.
    pub current: bool,
    /// Whether the session has moved past this step.
    ///
    /// ERROR reads as completed once the session reaches END, although no
    /// session ever enters it.
    pub completed: bool,
    /// Validation failures recorded in this step.
    pub errors: usize,
}

/// Progress indicators of a whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// One entry per interactive step, in workflow order.
    pub steps: Vec<StepSummary>,
    /// Whether the session has not reached END.
    pub in_progress: bool,
    /// Whether the session has reached END.
    pub finished: bool,
    /// Validation failures across all steps.
    pub total_errors: usize,
}

impl StatsSummary {
    /// Summarises `stats` relative to the step the session is in.
    pub fn new(current: Step, stats: &TaskStats) -> Self {
        let steps = Step::INTERACTIVE
            .iter()
            .map(|&step| StepSummary {
                step,
                current: step == current,
                completed: step < current,
                errors: stats.errors(step).len(),
            })
            .collect();
        Self {
            steps,
            in_progress: current != Step::End,
            finished: current == Step::End,
            total_errors: stats.error_count(),
        }
    }

    /// Entry of `step`, if it is interactive.
    pub fn step(&self, step: Step) -> Option<&StepSummary> {
        self.steps.iter().find(|summary| summary.step == step)
    }
}

/// Full snapshot of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Exercise description.
    pub task: TaskSpec,
    /// SHA-256 of the canonical JSON of `task`.
    pub task_hash: String,
    /// Sampled function minimum.
    pub f_min: f64,
    /// Sampled function maximum.
    pub f_max: f64,
    /// Inputs of the area estimate, once a rectangle exists.
    pub integral: Option<IntegralInputs>,
    /// Area estimate implied by the counted points.
    pub true_estimate: Option<f64>,
    /// Progress.
    pub state: TaskState,
    /// Audit trail.
    pub stats: TaskStats,
    /// Progress indicators.
    pub summary: StatsSummary,
}

impl TaskSession {
    /// Progress indicators of this session.
    pub fn summary(&self) -> StatsSummary {
        StatsSummary::new(self.step(), self.stats())
    }

    /// Serializable snapshot of this session.
    pub fn report(&self) -> Result<SessionReport, MctError> {
        let task = self.task().spec();
        let task_hash = stable_hash_string(&task)?;
        let integral = self.state().integral_inputs();
        Ok(SessionReport {
            task,
            task_hash,
            f_min: self.f_min(),
            f_max: self.f_max(),
            integral,
            true_estimate: integral.map(|inputs| inputs.estimate()),
            state: self.state().clone(),
            stats: self.stats().clone(),
            summary: self.summary(),
        })
    }
}
