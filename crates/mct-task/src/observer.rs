//! Notification hook for session records.

use crate::stats::{ActionRecord, ErrorRecord};
use crate::taxonomy::Step;

/// Hook invoked after every record a session appends to its stats.
///
/// Both methods default to no-ops so implementors only override what they watch.
pub trait SessionObserver {
    /// A successful call was recorded under `step`.
    fn on_action(&mut self, step: Step, record: &ActionRecord) {
        let _ = (step, record);
    }

    /// A failed validation was recorded under `step`.
    fn on_error(&mut self, step: Step, record: &ErrorRecord) {
        let _ = (step, record);
    }
}

/// Observer that ignores every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
