use serde::Serialize;

use crate::models::timeline::{ProgressTimeline, Step};

/// Outcome of evaluating a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    Pending(Step),
    Complete,
}

/// Wire shape returned to the wizard client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProgressReport {
    pub completed: bool,
    pub next_step: Option<Step>,
}

impl From<NextStep> for ProgressReport {
    fn from(next: NextStep) -> Self {
        match next {
            NextStep::Pending(step) => Self {
                completed: false,
                next_step: Some(step),
            },
            NextStep::Complete => Self {
                completed: true,
                next_step: None,
            },
        }
    }
}

/// First step in canonical order that is required and not yet completed.
pub fn next_step(timeline: &ProgressTimeline) -> NextStep {
    Step::ORDER
        .into_iter()
        .find(|&step| timeline.is_required(step) && !timeline.is_completed(step))
        .map_or(NextStep::Complete, NextStep::Pending)
}

/// Sets the overall `completed` flag. Returns `true` only on the transition,
/// so callers persist at most once.
pub fn mark_timeline_complete(timeline: &mut ProgressTimeline) -> bool {
    if timeline.completed {
        return false;
    }
    timeline.completed = true;
    true
}
