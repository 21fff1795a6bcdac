//! # pioview Build
//!
//! Runs PlatformIO and streams its console output to a viewer.
//!
//! ## Architecture
//!
//! ```text
//!  platformio stdout+stderr
//!          │
//!          ▼
//!   StreamPump (worker thread) ── classify + highlight ──► EventQueue
//!                                                             │
//!                                        BuildMonitor::tick() ◄┘  (viewer timer)
//! ```
//!
//! The pump owns the classifier state and runs until the tool closes its
//! output. The viewer side, [`BuildMonitor`], polls the queue without blocking
//! and reports completion once the pump thread has exited *and* the queue is
//! drained.
//!
//! ## Example
//!
//! ```no_run
//! use pioview_build::{BuildConfig, BuildRequest, BuildType, ProcessSource, start_build};
//! use pioview_log::RenderEvent;
//!
//! let config = BuildConfig::default();
//! let request = BuildRequest::new(BuildType::Build, "mega2560");
//! let monitor = start_build(&request, &config, &ProcessSource)?;
//!
//! let mut transcript: Vec<RenderEvent> = Vec::new();
//! let report = monitor.run_to_completion(&mut transcript, config.poll_interval())?;
//! println!("{} lines, {} warnings", report.lines, report.warnings);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;

pub mod config;
pub mod monitor;
pub mod platformio;
pub mod pump;
pub mod queue;

pub use config::BuildConfig;
pub use monitor::{BuildMonitor, BuildOutcome, EventSink, Tick, pump_stream};
pub use platformio::{
    BuildRequest, BuildTrailer, BuildType, OutputSource, ProcessSource, SpawnedOutput, start_build,
};
pub use pump::{PumpError, PumpReport, StreamPump};
pub use queue::{EventReceiver, EventSender, event_queue};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown build type: {0}")]
    UnknownBuildType(String),
    #[error("failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start the output pump thread")]
    Thread(#[source] std::io::Error),
    #[error(transparent)]
    Pump(#[from] PumpError),
    #[error("output pump thread panicked")]
    ProducerPanicked,
    #[error("failed to write build output")]
    Sink(#[source] std::io::Error),
}
