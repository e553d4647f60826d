mod cli;
mod export;
mod logging;
mod settings;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use chrono::Utc;
use clap::Parser;
use engine_logging::{engine_info, engine_warn};
use log::LevelFilter;
use probe_core::{normalize_targets, ResultSink, RunOutcome};
use probe_engine::{CancelHandle, EngineEvent, EngineHandle};

use crate::cli::Cli;
use crate::logging::LogDestination;
use crate::settings::{load_settings, Settings};

/// How long the event loop waits before logging a progress line on its own.
const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let destination = match cli.log_file.clone() {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(destination, level);

    let settings = match cli.config.as_deref() {
        Some(path) => load_settings(path)?,
        None => Settings::default(),
    };
    let config = settings
        .merge_cli(&cli)?
        .into_config()
        .context("invalid probe options")?;

    let raw = read_targets(cli.targets.as_deref())?;
    let normalized = normalize_targets(&raw);
    engine_info!(
        "Loaded {} targets ({} blank lines skipped)",
        normalized.valid_count(),
        normalized.empty_count
    );
    if normalized.is_empty() {
        bail!("no targets to probe");
    }

    let mut sink = ResultSink::new(normalized.valid_count());
    let started = Instant::now();
    let handle = EngineHandle::start(normalized.targets, config);
    watch_for_interrupt(handle.cancel_handle());

    loop {
        let event = match handle.recv_timeout(PROGRESS_INTERVAL) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => {
                engine_info!(
                    "Still probing: {}/{} done after {}",
                    sink.completed_count(),
                    sink.expected_count(),
                    export::format_elapsed(started.elapsed())
                );
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        };
        match event {
            EngineEvent::Started { total } => engine_info!("Probing {} targets", total),
            EngineEvent::Result(result) => {
                engine_info!(
                    "[{}/{}] {} {}",
                    sink.completed_count() + 1,
                    sink.expected_count(),
                    result.target,
                    result.state
                );
                if !sink.insert(result) {
                    engine_warn!("Ignored a second result for an already reported target");
                }
            }
            EngineEvent::Finished(outcome) => {
                sink.finish(outcome);
                break;
            }
        }
    }

    let elapsed = started.elapsed();
    let view = sink.view();
    let output = cli.output.clone().unwrap_or_else(|| {
        PathBuf::from(export::default_filename(cli.format, Utc::now().timestamp()))
    });
    let content = export::render(&view, cli.format, elapsed)?;
    let written = export::write_atomic(&output, &content)
        .with_context(|| format!("failed to write results to {}", output.display()))?;

    println!(
        "{}/{} targets done in {}: {} stable, {} unstable, {} unreachable -> {}",
        view.completed,
        view.expected,
        export::format_elapsed(elapsed),
        view.counts.stable,
        view.counts.unstable,
        view.counts.unreachable,
        written.display()
    );

    match view.outcome {
        Some(RunOutcome::Completed) => Ok(()),
        Some(RunOutcome::Cancelled) => {
            println!("Run cancelled; partial results written.");
            Ok(())
        }
        Some(RunOutcome::Faulted(reason)) => bail!("probe run faulted: {reason}"),
        None => bail!("probe engine stopped without reporting an outcome"),
    }
}

fn read_targets(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read targets from {}", path.display())),
        _ => io::read_to_string(io::stdin()).context("failed to read targets from stdin"),
    }
}

/// Cancel the run on Ctrl-C. The watcher thread lives until the process exits.
fn watch_for_interrupt(cancel: CancelHandle) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                engine_warn!("Ctrl-C handling unavailable: {}", err);
                return;
            }
        };
        runtime.block_on(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                engine_warn!("Interrupted, cancelling probe run");
                cancel.cancel();
            }
        });
    });
}
