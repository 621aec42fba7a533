//! vekta-engine: Pure parameter-to-preview synchronization engine (sans-IO).
//!
//! Tracks which remote artifact the displayed preview corresponds to,
//! collapses bursts of parameter edits into single reprocess requests,
//! guards against out-of-order and stale responses, and owns the
//! viewer's mount lifecycle.
//!
//! This crate has **no I/O dependencies** -- network calls and timers
//! are driven by the caller against the command values the engine
//! returns, which keeps every ordering property natively testable.
//! All browser interaction lives in `vekta-io`.

pub mod engine;
pub mod error;
pub mod params;
pub mod protocol;
pub mod sequencer;
pub mod session;
pub mod viewer;

pub use engine::{PreviewEngine, ReprocessCommand, UploadCommand};
pub use error::EngineError;
pub use params::{ControlVisibility, ParamEdit, TransformMode, TransformParams};
pub use protocol::{
    ErrorResponse, PreviewArtifact, ReprocessRequest, ReprocessResponse, UploadResponse,
};
pub use sequencer::{DEBOUNCE_QUIET_PERIOD, DebounceToken, RequestKind, RequestTicket};
pub use session::{SessionState, SourceRef};
pub use viewer::{MountedPreview, PreviewViewer, ViewTransform};
