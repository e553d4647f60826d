//! Probe core: pure target handling, classification and result ordering.
mod candidate;
mod classify;
mod config;
mod result;
mod sink;
mod target;

pub use candidate::resolve_candidates;
pub use classify::{classify, AttemptTally, Classification, Stability, StabilityState, Verdict};
pub use config::{
    parse_header_block, ConfigError, HttpMethod, ProbeConfig, ProbeInputs,
    DEFAULT_ATTEMPTS_PER_CANDIDATE, DEFAULT_MAX_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_USER_AGENT,
};
pub use result::{ProbeResult, RunOutcome};
pub use sink::{ResultRowView, ResultSink, SinkView, StateCounts};
pub use target::{normalize_targets, NormalizedTargets, Target, TargetId};
