use std::fmt;

/// Success count accumulated over the attempts made against one candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptTally {
    pub candidate_url: String,
    success_count: u32,
    attempts: u32,
}

impl AttemptTally {
    pub fn new(candidate_url: impl Into<String>) -> Self {
        Self {
            candidate_url: candidate_url.into(),
            success_count: 0,
            attempts: 0,
        }
    }

    pub fn record(&mut self, success: bool) {
        self.attempts += 1;
        if success {
            self.success_count += 1;
        }
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Unstable,
    Unreachable,
}

impl Stability {
    pub fn label(self) -> &'static str {
        match self {
            Stability::Stable => "Stable",
            Stability::Unstable => "Unstable",
            Stability::Unreachable => "Unreachable",
        }
    }
}

/// Stability class together with the counts it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilityState {
    pub stability: Stability,
    pub success_count: u32,
    pub attempts: u32,
}

impl fmt::Display for StabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}/{})",
            self.stability.label(),
            self.success_count,
            self.attempts
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Try the next candidate, if there is one.
    Continue,
    /// This candidate settles the target.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub state: StabilityState,
    pub verdict: Verdict,
}

/// Decision table for one candidate's tally.
///
/// | successes        | state       | verdict  |
/// |------------------|-------------|----------|
/// | 0                | Unreachable | Continue |
/// | == attempts      | Stable      | Stop     |
/// | anything between | Unstable    | Stop     |
///
/// Only a total failure falls through to the next candidate; a host that
/// answered at all on a scheme is considered resolved on that scheme.
pub fn classify(tally: &AttemptTally) -> Classification {
    let success_count = tally.success_count();
    let attempts = tally.attempts();
    let (stability, verdict) = if success_count == 0 {
        (Stability::Unreachable, Verdict::Continue)
    } else if success_count == attempts {
        (Stability::Stable, Verdict::Stop)
    } else {
        (Stability::Unstable, Verdict::Stop)
    };

    Classification {
        state: StabilityState {
            stability,
            success_count,
            attempts,
        },
        verdict,
    }
}
