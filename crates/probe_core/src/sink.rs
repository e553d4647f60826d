use crate::{ProbeResult, RunOutcome, Stability, TargetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateCounts {
    pub stable: usize,
    pub unstable: usize,
    pub unreachable: usize,
}

impl StateCounts {
    fn bump(&mut self, stability: Stability) {
        match stability {
            Stability::Stable => self.stable += 1,
            Stability::Unstable => self.unstable += 1,
            Stability::Unreachable => self.unreachable += 1,
        }
    }
}

/// Collects completion events as they arrive and keeps them in id order.
///
/// Results come in whatever order their tasks finish; after every insert the
/// visible rows are ascending by id, so a display can render them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSink {
    rows: Vec<ProbeResult>,
    expected: usize,
    counts: StateCounts,
    outcome: Option<RunOutcome>,
}

impl ResultSink {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            ..Self::default()
        }
    }

    /// Returns `false` (and changes nothing) if a result with this id is
    /// already present.
    pub fn insert(&mut self, result: ProbeResult) -> bool {
        let index = self.rows.partition_point(|row| row.id < result.id);
        if self.rows.get(index).is_some_and(|row| row.id == result.id) {
            return false;
        }
        self.counts.bump(result.state.stability);
        self.rows.insert(index, result);
        true
    }

    pub fn finish(&mut self, outcome: RunOutcome) {
        self.outcome = Some(outcome);
    }

    pub fn rows(&self) -> &[ProbeResult] {
        &self.rows
    }

    pub fn completed_count(&self) -> usize {
        self.rows.len()
    }

    pub fn expected_count(&self) -> usize {
        self.expected
    }

    pub fn counts(&self) -> StateCounts {
        self.counts
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn view(&self) -> SinkView {
        SinkView {
            completed: self.completed_count(),
            expected: self.expected,
            counts: self.counts,
            outcome: self.outcome.clone(),
            rows: self.rows.iter().map(ResultRowView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SinkView {
    pub completed: usize,
    pub expected: usize,
    pub counts: StateCounts,
    pub outcome: Option<RunOutcome>,
    pub rows: Vec<ResultRowView>,
}

/// Display strings for one result row. Missing title or content render empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub id: TargetId,
    pub target: String,
    pub url: String,
    pub state: String,
    pub title: String,
    pub content: String,
}

impl From<&ProbeResult> for ResultRowView {
    fn from(result: &ProbeResult) -> Self {
        Self {
            id: result.id,
            target: result.target.clone(),
            url: result.resolved_url.clone(),
            state: result.state.to_string(),
            title: result.title.clone().unwrap_or_default(),
            content: result.content.clone().unwrap_or_default(),
        }
    }
}
