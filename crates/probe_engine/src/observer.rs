use std::sync::mpsc;

use probe_core::{ProbeResult, RunOutcome};

use crate::EngineEvent;

/// Receives run events. Called from worker tasks, so results arrive in
/// completion order, not id order.
pub trait ProbeObserver: Send + Sync {
    fn on_started(&self, _total: usize) {}
    fn on_result(&self, result: ProbeResult);
    fn on_finished(&self, outcome: RunOutcome);
}

/// Forwards every callback as an [`EngineEvent`] over a std channel.
pub struct ChannelObserver {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProbeObserver for ChannelObserver {
    fn on_started(&self, total: usize) {
        let _ = self.tx.send(EngineEvent::Started { total });
    }

    fn on_result(&self, result: ProbeResult) {
        let _ = self.tx.send(EngineEvent::Result(result));
    }

    fn on_finished(&self, outcome: RunOutcome) {
        let _ = self.tx.send(EngineEvent::Finished(outcome));
    }
}
