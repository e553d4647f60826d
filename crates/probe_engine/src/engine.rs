use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use engine_logging::engine_error;
use probe_core::{ProbeConfig, RunOutcome, Target};

use crate::observer::{ChannelObserver, ProbeObserver};
use crate::probe::{Prober, ReqwestProber};
use crate::scheduler::{CancelHandle, ProbeScheduler};
use crate::EngineEvent;

/// Handle to one run executing on a background thread with its own runtime.
///
/// Meant for synchronous callers: wait for events with
/// [`recv_timeout`](Self::recv_timeout). The last event of every run is
/// [`EngineEvent::Finished`]. Dropping the handle cancels the run and waits
/// for the worker thread.
pub struct EngineHandle {
    cancel: CancelHandle,
    event_rx: mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn start(targets: Vec<Target>, config: ProbeConfig) -> Self {
        Self::start_with_prober(targets, config, Arc::new(ReqwestProber::new()))
    }

    pub fn start_with_prober(
        targets: Vec<Target>,
        config: ProbeConfig,
        prober: Arc<dyn Prober>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        let mut scheduler = ProbeScheduler::with_prober(config, prober);
        let cancel = scheduler.cancel_handle();

        let worker = thread::spawn(move || {
            let observer: Arc<dyn ProbeObserver> = Arc::new(ChannelObserver::new(event_tx));
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start probe runtime: {}", err);
                    observer.on_finished(RunOutcome::Faulted(format!(
                        "failed to start runtime: {err}"
                    )));
                    return;
                }
            };
            runtime.block_on(scheduler.run(targets, observer));
        });

        Self {
            cancel,
            event_rx,
            worker: Some(worker),
        }
    }

    /// Request cancellation. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Waits up to `timeout` for the next event. `Disconnected` once the run
    /// is over and every event has been drained.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        self.event_rx.recv_timeout(timeout)
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
