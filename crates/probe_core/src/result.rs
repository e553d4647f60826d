use std::fmt;

use crate::{StabilityState, TargetId};

/// Final word on one target, produced once when its probing completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub id: TargetId,
    pub target: String,
    pub resolved_url: String,
    pub state: StabilityState,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// How a whole run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Cancelled,
    Faulted(String),
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Completed => write!(f, "completed"),
            RunOutcome::Cancelled => write!(f, "cancelled"),
            RunOutcome::Faulted(reason) => write!(f, "faulted: {reason}"),
        }
    }
}
