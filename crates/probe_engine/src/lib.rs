//! Probe engine: HTTP probing, bounded-concurrency scheduling and run handles.
mod decode;
mod engine;
mod observer;
mod preview;
mod probe;
mod scheduler;
mod title;
mod types;

pub use decode::{decode_body, DecodedBody};
pub use engine::EngineHandle;
pub use observer::{ChannelObserver, ProbeObserver};
pub use preview::{prepare_content_preview, MAX_PREVIEW_CONTENT};
pub use probe::{Prober, ReqwestProber, MAX_BODY_BYTES};
pub use scheduler::{probe_target, CancelHandle, ProbeScheduler};
pub use title::extract_title;
pub use types::{CandidateProbe, EngineEvent, ProbeError, RunState};

pub use tokio_util::sync::CancellationToken;
