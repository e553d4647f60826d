use std::sync::Arc;

use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use probe_core::{
    classify, resolve_candidates, ProbeConfig, ProbeResult, RunOutcome, Target, Verdict,
};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::probe::{Prober, ReqwestProber};
use crate::{ProbeError, ProbeObserver, RunState};

/// Idempotent, cloneable trigger for a run's cancellation signal.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

enum TaskExit {
    Finished,
    Cancelled,
}

/// Owns the state of exactly one run: the concurrency gate, the cancellation
/// token and the spawned tasks. Build a new scheduler for every run.
pub struct ProbeScheduler {
    config: Arc<ProbeConfig>,
    prober: Arc<dyn Prober>,
    cancel: CancellationToken,
    state: RunState,
}

impl ProbeScheduler {
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_prober(config, Arc::new(ReqwestProber::new()))
    }

    pub fn with_prober(config: ProbeConfig, prober: Arc<dyn Prober>) -> Self {
        Self {
            config: Arc::new(config),
            prober,
            cancel: CancellationToken::new(),
            state: RunState::Idle,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            token: self.cancel.clone(),
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Probe every target and report through `observer`.
    ///
    /// Must be awaited inside a tokio runtime; tasks are spawned onto it.
    /// `observer.on_finished` is called exactly once, with the same outcome
    /// that is returned.
    pub async fn run(
        &mut self,
        targets: Vec<Target>,
        observer: Arc<dyn ProbeObserver>,
    ) -> RunOutcome {
        if self.state != RunState::Idle {
            let outcome = RunOutcome::Faulted("scheduler has already been run".to_string());
            observer.on_finished(outcome.clone());
            return outcome;
        }
        self.state = RunState::Running;

        let outcome = self.drive(targets, observer.clone()).await;
        match &outcome {
            RunOutcome::Faulted(reason) => engine_error!("Probe run faulted: {}", reason),
            other => engine_info!("Probe run {}", other),
        }
        self.state = RunState::from(&outcome);
        observer.on_finished(outcome.clone());
        outcome
    }

    async fn drive(&self, targets: Vec<Target>, observer: Arc<dyn ProbeObserver>) -> RunOutcome {
        if let Err(err) = self.config.validate() {
            return RunOutcome::Faulted(ProbeError::from(err).to_string());
        }

        let total = targets.len();
        let permits = self.config.max_concurrency.min(Semaphore::MAX_PERMITS);
        let gate = Arc::new(Semaphore::new(permits));
        engine_info!(
            "Starting probe run: {} targets, {} concurrent, {} attempts per candidate, {} {:?} timeout",
            total,
            permits,
            self.config.attempts_per_candidate,
            self.config.method,
            self.config.request_timeout
        );
        observer.on_started(total);

        let mut tasks = JoinSet::new();
        let mut skipped = 0;
        for (submitted, target) in targets.into_iter().enumerate() {
            if self.cancel.is_cancelled() {
                skipped = total - submitted;
                break;
            }
            tasks.spawn(run_target(
                target,
                gate.clone(),
                self.prober.clone(),
                self.config.clone(),
                self.cancel.clone(),
                observer.clone(),
            ));
        }
        if skipped > 0 {
            engine_warn!("Cancelled before submitting {} targets", skipped);
        }

        let mut cancel_observed = skipped > 0;
        let mut fault: Option<String> = None;
        while let Some(joined) = tasks.join_next().await {
            let reason = match joined {
                Ok(Ok(TaskExit::Finished)) => continue,
                Ok(Ok(TaskExit::Cancelled)) => {
                    cancel_observed = true;
                    continue;
                }
                Ok(Err(err)) => err.to_string(),
                Err(err) if err.is_panic() => format!("probe task panicked: {err}"),
                Err(err) => err.to_string(),
            };
            if fault.is_none() {
                // Stop the siblings; the run is already lost.
                self.cancel.cancel();
                fault = Some(reason);
            }
        }

        match fault {
            Some(reason) => RunOutcome::Faulted(reason),
            None if cancel_observed => RunOutcome::Cancelled,
            None => RunOutcome::Completed,
        }
    }
}

async fn run_target(
    target: Target,
    gate: Arc<Semaphore>,
    prober: Arc<dyn Prober>,
    config: Arc<ProbeConfig>,
    cancel: CancellationToken,
    observer: Arc<dyn ProbeObserver>,
) -> Result<TaskExit, ProbeError> {
    // Held until this function returns, whichever way it returns.
    let _permit = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Ok(TaskExit::Cancelled),
        permit = gate.acquire_owned() => permit.map_err(|_| ProbeError::GateClosed)?,
    };

    match probe_target(&target, prober.as_ref(), &config, &cancel).await {
        Ok(result) => {
            engine_info!(
                "Target {} {} -> {} via {}",
                result.id,
                result.target,
                result.state,
                result.resolved_url
            );
            observer.on_result(result);
            Ok(TaskExit::Finished)
        }
        Err(ProbeError::Cancelled) => {
            engine_debug!("Target {} {} cancelled in flight", target.id, target.raw);
            Ok(TaskExit::Cancelled)
        }
        Err(err) => Err(err),
    }
}

/// Walk a target's candidates until one settles it.
///
/// A candidate with zero successes hands over to the next one; any success
/// stops the walk. When every candidate fails, the last one's tally and URL
/// are reported.
pub async fn probe_target(
    target: &Target,
    prober: &dyn Prober,
    config: &ProbeConfig,
    cancel: &CancellationToken,
) -> Result<ProbeResult, ProbeError> {
    let mut settled = None;
    for candidate in resolve_candidates(&target.raw) {
        let probe = prober.probe(&candidate, config, cancel).await?;
        let classification = classify(&probe.tally);
        engine_debug!(
            "Target {} candidate {} -> {}",
            target.id,
            candidate,
            classification.state
        );
        let verdict = classification.verdict;
        settled = Some((probe, classification));
        if verdict == Verdict::Stop {
            break;
        }
    }

    let Some((probe, classification)) = settled else {
        unreachable!("candidate list is never empty");
    };
    Ok(ProbeResult {
        id: target.id,
        target: target.raw.clone(),
        resolved_url: probe.tally.candidate_url,
        state: classification.state,
        title: probe.title,
        content: probe.content,
    })
}
