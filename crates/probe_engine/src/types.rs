use probe_core::{AttemptTally, ConfigError, ProbeResult, RunOutcome};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Started { total: usize },
    Result(ProbeResult),
    Finished(RunOutcome),
}

/// Outcome of one retry series against a single candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProbe {
    pub tally: AttemptTally,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Errors that end a probing task early. Network failures never show up here;
/// they are counted as failed attempts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("cancelled")]
    Cancelled,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid header {name:?}: {message}")]
    InvalidHeader { name: String, message: String },
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("concurrency gate closed")]
    GateClosed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
    Faulted(String),
}

impl From<&RunOutcome> for RunState {
    fn from(outcome: &RunOutcome) -> Self {
        match outcome {
            RunOutcome::Completed => RunState::Completed,
            RunOutcome::Cancelled => RunState::Cancelled,
            RunOutcome::Faulted(reason) => RunState::Faulted(reason.clone()),
        }
    }
}
