//! Session state: the currently selected source image.
//!
//! Tracks the raw bytes of the selected file alongside the opaque
//! reference the transform service assigns on upload. The reference is
//! what lets repeated parameter edits reprocess the same source without
//! re-uploading the bytes.

use crate::error::EngineError;

/// Allowed file extensions for source images, per the transform service.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Opaque server-assigned identifier for an uploaded source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRef(String);

impl SourceRef {
    /// Wrap a server-assigned reference string.
    #[must_use]
    pub const fn new(reference: String) -> Self {
        Self(reference)
    }

    /// The raw reference string, as sent back in reprocess requests.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The currently selected source image.
///
/// Created by [`SessionState::select_file`]; the reference starts empty
/// and is filled in when the upload succeeds. Replaced wholesale on the
/// next file selection -- no two source artifacts ever coexist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    /// Server-assigned reference, present once upload has succeeded.
    reference: Option<SourceRef>,
    /// Raw file bytes, kept for the lifetime of the selection.
    raw_bytes: Vec<u8>,
    /// Original filename, forwarded with the upload.
    filename: String,
}

impl SourceArtifact {
    /// Raw file bytes of the selection.
    #[must_use]
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// Original filename of the selection.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Owns the source artifact lifecycle.
#[derive(Debug, Default)]
pub struct SessionState {
    source: Option<SourceArtifact>,
}

impl SessionState {
    /// Create an empty session with no source selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current source with a newly selected file.
    ///
    /// Validates before any network traffic happens: the filename must
    /// carry an allowed image extension and the bytes must sniff as a
    /// known raster format. On success the previous artifact (bytes and
    /// reference both) is discarded and the new one stored with an
    /// empty reference, awaiting upload.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for a non-image selection;
    /// the existing source, if any, is left untouched.
    pub fn select_file(&mut self, filename: &str, bytes: Vec<u8>) -> Result<(), EngineError> {
        if !has_allowed_extension(filename) {
            return Err(EngineError::Validation(format!(
                "unsupported file type: {filename}"
            )));
        }
        if image::guess_format(&bytes).is_err() {
            return Err(EngineError::Validation(format!(
                "{filename} does not look like an image file"
            )));
        }
        self.source = Some(SourceArtifact {
            reference: None,
            raw_bytes: bytes,
            filename: filename.to_owned(),
        });
        Ok(())
    }

    /// Record the reference assigned by a successful upload.
    ///
    /// No-op if the selection was replaced while the upload was in
    /// flight (the sequencer will have discarded that response anyway).
    pub fn set_reference(&mut self, reference: SourceRef) {
        if let Some(source) = self.source.as_mut() {
            source.reference = Some(reference);
        }
    }

    /// Drop the reference after a failed upload, keeping the bytes.
    ///
    /// Subsequent parameter edits become no-ops again until a new file
    /// selection re-uploads.
    pub fn clear_reference(&mut self) {
        if let Some(source) = self.source.as_mut() {
            source.reference = None;
        }
    }

    /// The current source artifact, if a file has been selected.
    #[must_use]
    pub fn source(&self) -> Option<&SourceArtifact> {
        self.source.as_ref()
    }

    /// The upload-assigned reference, if the upload has succeeded.
    #[must_use]
    pub fn reference(&self) -> Option<&SourceRef> {
        self.source.as_ref().and_then(|s| s.reference.as_ref())
    }

    /// Whether a reprocess request can currently be issued.
    #[must_use]
    pub fn has_reference(&self) -> bool {
        self.reference().is_some()
    }
}

/// Check whether a filename has an allowed image extension.
fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|a| a.eq_ignore_ascii_case(ext))
    })
}
