//! The preview engine: one owner for parameters, session, sequencing,
//! and the viewer.
//!
//! All state mutation happens synchronously inside the event methods
//! here; the only asynchronous work is the network round trips, which
//! the caller performs against the command values ([`UploadCommand`],
//! [`ReprocessCommand`]) these methods return. Responses come back in
//! through the `apply_*` methods, which enforce the staleness rule
//! before anything touches the viewer.
//!
//! Typical wiring (the app crate):
//!
//! 1. file picked -> [`PreviewEngine::select_file`] -> run the upload,
//!    then [`apply_upload`](PreviewEngine::apply_upload) or
//!    [`apply_failure`](PreviewEngine::apply_failure)
//! 2. slider moved -> [`PreviewEngine::apply_edit`] -> sleep the quiet
//!    period -> [`PreviewEngine::debounce_elapsed`] -> run the
//!    reprocess, then [`apply_reprocess`](PreviewEngine::apply_reprocess)
//!    or `apply_failure`

use crate::error::EngineError;
use crate::params::{ControlVisibility, ParamEdit, TransformParams};
use crate::protocol::PreviewArtifact;
use crate::sequencer::{DebounceToken, RequestKind, RequestSequencer, RequestTicket, Settled};
use crate::session::{SessionState, SourceRef};
use crate::viewer::{MountedPreview, PreviewViewer, ViewTransform};

/// Command value for an upload round trip.
///
/// Carries everything the transport needs; the engine keeps its own
/// copy of the bytes in session state.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadCommand {
    /// Ticket to present back with the response.
    pub ticket: RequestTicket,
    /// Original filename of the selection.
    pub filename: String,
    /// Raw image bytes to upload.
    pub bytes: Vec<u8>,
    /// Parameter snapshot at issue time.
    pub params: TransformParams,
}

/// Command value for a reprocess round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ReprocessCommand {
    /// Ticket to present back with the response.
    pub ticket: RequestTicket,
    /// Source reference from the original upload.
    pub source: SourceRef,
    /// Parameter snapshot at debounce expiry -- the values of the last
    /// edit in the burst.
    pub params: TransformParams,
}

/// Owns all client-side state for one preview session.
#[derive(Debug, Default)]
pub struct PreviewEngine {
    params: TransformParams,
    session: SessionState,
    sequencer: RequestSequencer,
    viewer: PreviewViewer,
    /// The single surfaced message channel. Cleared whenever a new
    /// request is issued.
    last_error: Option<EngineError>,
}

impl PreviewEngine {
    /// Create an engine with default parameters and no source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Parameter edits -------------------------------------------------

    /// Apply a parameter edit and arm the debounce window.
    ///
    /// The edit always lands in the store (visibility updates
    /// immediately); the returned token is `None` when no upload has
    /// succeeded yet, in which case no network activity is scheduled.
    pub fn apply_edit(&mut self, edit: ParamEdit) -> Option<DebounceToken> {
        self.params.apply(edit);
        self.sequencer.note_edit(self.session.has_reference())
    }

    /// Redeem a debounce token after the quiet period.
    ///
    /// Returns a reprocess command only if the token is still current;
    /// superseded timers get `None` and cause no traffic.
    pub fn debounce_elapsed(&mut self, token: DebounceToken) -> Option<ReprocessCommand> {
        // The reference can vanish between arming and expiry (upload
        // failure); without it a reprocess is meaningless.
        let source = self.session.reference()?.clone();
        let ticket = self.sequencer.fire(token)?;
        self.last_error = None;
        Some(ReprocessCommand {
            ticket,
            source,
            params: self.params.clone(),
        })
    }

    // --- File selection --------------------------------------------------

    /// Select a new source file and issue its upload.
    ///
    /// Tears down the previous source and preview (viewer unmount
    /// included), cancels any pending debounce, and returns the upload
    /// command carrying the current parameter snapshot.
    ///
    /// # Errors
    ///
    /// Returns (and records on the error channel) a
    /// [`EngineError::Validation`] when the selection is not an
    /// acceptable image; existing state is untouched in that case.
    pub fn select_file(
        &mut self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadCommand, EngineError> {
        if let Err(e) = self.session.select_file(filename, bytes) {
            self.last_error = Some(e.clone());
            return Err(e);
        }
        self.viewer.unmount();
        self.last_error = None;
        let ticket = self.sequencer.begin_upload();
        // select_file stored the bytes; clone them out for the command.
        let source = self
            .session
            .source()
            .map(|s| (s.filename().to_owned(), s.raw_bytes().to_vec()))
            .unwrap_or_default();
        Ok(UploadCommand {
            ticket,
            filename: source.0,
            bytes: source.1,
            params: self.params.clone(),
        })
    }

    // --- Response application --------------------------------------------

    /// Apply a successful upload response.
    ///
    /// Subject to the same staleness rule as reprocess responses: if a
    /// newer request was issued in the meantime (another file selected,
    /// or a reprocess raced ahead) the response is discarded and the
    /// source reference is not stored.
    ///
    /// Returns whether the response was accepted.
    pub fn apply_upload(
        &mut self,
        ticket: RequestTicket,
        source_reference: String,
        artifact: PreviewArtifact,
    ) -> bool {
        debug_assert_eq!(ticket.kind, RequestKind::Upload);
        match self.sequencer.settle_success(ticket) {
            Settled::Accepted => {
                self.session.set_reference(SourceRef::new(source_reference));
                self.viewer.mount(artifact);
                true
            }
            Settled::Stale => false,
        }
    }

    /// Apply a successful reprocess response.
    ///
    /// Returns whether the response was accepted; stale responses leave
    /// the mounted preview untouched.
    pub fn apply_reprocess(&mut self, ticket: RequestTicket, artifact: PreviewArtifact) -> bool {
        debug_assert_eq!(ticket.kind, RequestKind::Reprocess);
        match self.sequencer.settle_success(ticket) {
            Settled::Accepted => {
                self.viewer.mount(artifact);
                true
            }
            Settled::Stale => false,
        }
    }

    /// Apply a failed response.
    ///
    /// Surfaces the error and leaves the last good preview mounted.
    /// A failed *current* upload also drops the session reference so
    /// later edits stay no-ops until a new selection; a stale upload's
    /// failure must not touch the reference of whatever replaced it.
    pub fn apply_failure(&mut self, ticket: RequestTicket, error: EngineError) {
        if ticket.kind == RequestKind::Upload && self.sequencer.is_current(ticket) {
            self.session.clear_reference();
        }
        self.sequencer.settle_failure(ticket);
        self.last_error = Some(error);
    }

    // --- Read surface -----------------------------------------------------

    /// Current parameter snapshot.
    #[must_use]
    pub const fn params(&self) -> &TransformParams {
        &self.params
    }

    /// Derived control visibility for the current parameters.
    #[must_use]
    pub const fn visible_controls(&self) -> ControlVisibility {
        self.params.visible_controls()
    }

    /// The mounted preview, if any.
    #[must_use]
    pub fn preview(&self) -> Option<&MountedPreview> {
        self.viewer.mounted()
    }

    /// Mutable view transform of the mounted preview, for pan/zoom input.
    pub fn view_mut(&mut self) -> Option<&mut ViewTransform> {
        self.viewer.view_mut()
    }

    /// Identity of the current viewer mount, for keyed rendering.
    #[must_use]
    pub const fn mount_id(&self) -> u64 {
        self.viewer.mount_id()
    }

    /// Whether the newest issued request is still in flight.
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.sequencer.in_flight()
    }

    /// The surfaced error message, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    /// Filename of the current selection, for display and downloads.
    #[must_use]
    pub fn source_filename(&self) -> Option<&str> {
        self.session.source().map(super::session::SourceArtifact::filename)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::params::TransformMode;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0; 16]);
        bytes
    }

    fn artifact(tag: &str) -> PreviewArtifact {
        PreviewArtifact {
            vector_content: format!("<svg>{tag}</svg>"),
            download_url: format!("/download/{tag}.svg"),
        }
    }

    /// Run an accepted upload so reprocess requests become possible.
    fn engine_with_uploaded_source() -> PreviewEngine {
        let mut engine = PreviewEngine::new();
        let upload = engine.select_file("cat.png", png_bytes()).unwrap();
        assert!(engine.apply_upload(upload.ticket, "ref-cat".into(), artifact("p1")));
        engine
    }

    #[test]
    fn upload_scenario_carries_exact_parameters() {
        // mode=color, color_count=8, simplify_tolerance=1.0, then select F.
        let mut engine = PreviewEngine::new();
        engine.apply_edit(ParamEdit::Mode(TransformMode::Color));
        engine.apply_edit(ParamEdit::ColorCount(8));
        engine.apply_edit(ParamEdit::SimplifyTolerance(1.0));

        let upload = engine.select_file("f.png", png_bytes()).unwrap();
        assert_eq!(upload.params.mode, TransformMode::Color);
        assert_eq!(upload.params.color_count, 8);
        assert!((upload.params.simplify_tolerance - 1.0).abs() < f64::EPSILON);
        assert_eq!(upload.ticket.kind, RequestKind::Upload);

        assert!(engine.apply_upload(upload.ticket, "ref-f".into(), artifact("p1")));
        assert_eq!(
            engine.preview().unwrap().artifact.vector_content,
            "<svg>p1</svg>"
        );
    }

    #[test]
    fn upload_command_compares_by_value_including_float_params() {
        let mut engine = PreviewEngine::new();
        engine.apply_edit(ParamEdit::SimplifyTolerance(2.5));
        let command = engine.select_file("cat.png", png_bytes()).unwrap();
        let copy = command.clone();
        assert_eq!(command, copy);

        let mut other = PreviewEngine::new();
        other.apply_edit(ParamEdit::SimplifyTolerance(3.0));
        let differing = other.select_file("cat.png", png_bytes()).unwrap();
        assert_ne!(command.params, differing.params);
    }

    #[test]
    fn edits_before_any_upload_produce_no_network_activity() {
        let mut engine = PreviewEngine::new();
        assert!(engine.apply_edit(ParamEdit::ColorCount(5)).is_none());
        assert!(!engine.in_flight());
        assert!(engine.last_error().is_none());
        // The edit itself still landed.
        assert_eq!(engine.params().color_count, 5);
    }

    #[test]
    fn rapid_drag_collapses_to_one_reprocess_with_final_value() {
        let mut engine = engine_with_uploaded_source();

        // colorCount 8 -> 5 -> 3 inside the quiet window.
        let t1 = engine.apply_edit(ParamEdit::ColorCount(5)).unwrap();
        let t2 = engine.apply_edit(ParamEdit::ColorCount(3)).unwrap();

        assert!(engine.debounce_elapsed(t1).is_none());
        let req = engine.debounce_elapsed(t2).unwrap();
        assert_eq!(req.params.color_count, 3);
        assert_eq!(req.source.as_str(), "ref-cat");

        // No second request fires from the same burst.
        assert!(engine.debounce_elapsed(t2).is_none());
    }

    #[test]
    fn stale_response_never_overrides_newer_accepted_preview() {
        let mut engine = engine_with_uploaded_source();

        let a = {
            let t = engine.apply_edit(ParamEdit::ColorCount(5)).unwrap();
            engine.debounce_elapsed(t).unwrap()
        };
        let b = {
            let t = engine.apply_edit(ParamEdit::ColorCount(3)).unwrap();
            engine.debounce_elapsed(t).unwrap()
        };

        // B's response lands first and is accepted.
        assert!(engine.apply_reprocess(b.ticket, artifact("b")));
        // A's slower response must be discarded.
        assert!(!engine.apply_reprocess(a.ticket, artifact("a")));
        assert_eq!(
            engine.preview().unwrap().artifact.vector_content,
            "<svg>b</svg>"
        );
    }

    #[test]
    fn failed_earlier_request_keeps_newer_preview_and_surfaces_error() {
        let mut engine = engine_with_uploaded_source();

        let two = {
            let t = engine.apply_edit(ParamEdit::ColorCount(5)).unwrap();
            engine.debounce_elapsed(t).unwrap()
        };
        let three = {
            let t = engine.apply_edit(ParamEdit::ColorCount(3)).unwrap();
            engine.debounce_elapsed(t).unwrap()
        };

        assert!(engine.apply_reprocess(three.ticket, artifact("three")));
        engine.apply_failure(
            two.ticket,
            EngineError::Transport("status 500".into()),
        );

        // Preview #3 stays mounted, not a blank state, and the error shows.
        assert_eq!(
            engine.preview().unwrap().artifact.vector_content,
            "<svg>three</svg>"
        );
        assert!(matches!(
            engine.last_error(),
            Some(EngineError::Transport(_))
        ));
        assert!(!engine.in_flight());
    }

    #[test]
    fn new_selection_discards_pending_debounce_and_old_preview() {
        let mut engine = engine_with_uploaded_source();
        let token = engine.apply_edit(ParamEdit::ColorCount(4)).unwrap();

        let upload = engine.select_file("dog.png", png_bytes()).unwrap();
        // Old preview torn down, pending debounce dead, one upload issued.
        assert!(engine.preview().is_none());
        assert!(engine.debounce_elapsed(token).is_none());
        assert_eq!(upload.ticket.kind, RequestKind::Upload);
        assert!(engine.in_flight());
    }

    #[test]
    fn abandoned_upload_response_is_discarded() {
        let mut engine = PreviewEngine::new();
        let first = engine.select_file("one.png", png_bytes()).unwrap();
        let second = engine.select_file("two.png", png_bytes()).unwrap();

        // The first upload's response arrives after the second selection.
        assert!(!engine.apply_upload(first.ticket, "ref-one".into(), artifact("one")));
        assert!(engine.preview().is_none());
        // Its reference must not attach to the new selection either.
        assert!(engine.apply_edit(ParamEdit::ColorCount(4)).is_none());

        assert!(engine.apply_upload(second.ticket, "ref-two".into(), artifact("two")));
        assert_eq!(
            engine.preview().unwrap().artifact.vector_content,
            "<svg>two</svg>"
        );
    }

    #[test]
    fn mode_switch_updates_visibility_and_still_debounces_one_reprocess() {
        let mut engine = engine_with_uploaded_source();

        let token = engine
            .apply_edit(ParamEdit::Mode(TransformMode::BlackAndWhite))
            .unwrap();
        let controls = engine.visible_controls();
        assert!(!controls.color_count);
        assert!(controls.bg_threshold);

        // The switch itself makes no network call; the debounce expiry
        // issues exactly one reprocess even with otherwise unchanged
        // parameters.
        let req = engine.debounce_elapsed(token).unwrap();
        assert_eq!(req.params.mode, TransformMode::BlackAndWhite);
        assert!(engine.debounce_elapsed(token).is_none());
    }

    #[test]
    fn validation_failure_surfaces_error_and_changes_nothing() {
        let mut engine = engine_with_uploaded_source();
        let err = engine
            .select_file("notes.txt", b"plain text".to_vec())
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert!(matches!(
            engine.last_error(),
            Some(EngineError::Validation(_))
        ));
        // Previous source and preview both survive.
        assert_eq!(engine.source_filename(), Some("cat.png"));
        assert!(engine.preview().is_some());
    }

    #[test]
    fn upload_failure_keeps_bytes_but_blocks_reprocessing() {
        let mut engine = PreviewEngine::new();
        let upload = engine.select_file("cat.png", png_bytes()).unwrap();
        engine.apply_failure(
            upload.ticket,
            EngineError::Transport("connection refused".into()),
        );

        assert!(engine.last_error().is_some());
        assert_eq!(engine.source_filename(), Some("cat.png"));
        // No reference, so edits schedule nothing.
        assert!(engine.apply_edit(ParamEdit::ColorCount(4)).is_none());
    }

    #[test]
    fn stale_upload_failure_does_not_clear_new_selections_reference() {
        let mut engine = PreviewEngine::new();
        let first = engine.select_file("one.png", png_bytes()).unwrap();
        let second = engine.select_file("two.png", png_bytes()).unwrap();
        assert!(engine.apply_upload(second.ticket, "ref-two".into(), artifact("two")));

        // The abandoned upload now fails; the accepted one keeps working.
        engine.apply_failure(first.ticket, EngineError::Transport("timeout".into()));
        assert!(engine.apply_edit(ParamEdit::ColorCount(4)).is_some());
    }

    #[test]
    fn issuing_a_request_clears_the_previous_error() {
        let mut engine = engine_with_uploaded_source();
        let t = engine.apply_edit(ParamEdit::ColorCount(5)).unwrap();
        let req = engine.debounce_elapsed(t).unwrap();
        engine.apply_failure(req.ticket, EngineError::Transport("status 502".into()));
        assert!(engine.last_error().is_some());

        let t = engine.apply_edit(ParamEdit::ColorCount(6)).unwrap();
        let _req = engine.debounce_elapsed(t).unwrap();
        assert!(engine.last_error().is_none());
    }

    #[test]
    fn each_accepted_preview_remounts_the_viewer() {
        let mut engine = engine_with_uploaded_source();
        let first_mount = engine.mount_id();
        engine.view_mut().unwrap().zoom_by(3.0);

        let t = engine.apply_edit(ParamEdit::ColorCount(5)).unwrap();
        let req = engine.debounce_elapsed(t).unwrap();
        assert!(engine.apply_reprocess(req.ticket, artifact("next")));

        // Fresh mount identity and reset view state.
        assert!(engine.mount_id() > first_mount);
        let view = engine.preview().unwrap().view;
        assert!((view.zoom - 1.0).abs() < f64::EPSILON);
    }
}
