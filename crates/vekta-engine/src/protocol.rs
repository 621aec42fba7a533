//! Wire types for the two transform service operations.
//!
//! The service is out of scope for this crate -- these types pin down
//! the request and response JSON shapes and nothing else. Field names
//! follow the service contract: uploads go as multipart form data (see
//! the io crate), reprocess requests as the JSON body serialized from
//! [`ReprocessRequest`].

use serde::{Deserialize, Serialize};

use crate::params::{TransformMode, TransformParams};

/// Successful upload response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Opaque reference to the stored source image, reused by
    /// subsequent reprocess requests.
    pub source_reference: String,
    /// URL to GET the generated vector markup from.
    pub vector_content_url: String,
    /// URL for downloading the generated file.
    pub download_url: String,
}

/// Successful reprocess response body.
///
/// Mirrors [`UploadResponse`] minus the source reference -- the source
/// is reused, not re-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReprocessResponse {
    /// URL to GET the regenerated vector markup from.
    pub vector_content_url: String,
    /// URL for downloading the regenerated file.
    pub download_url: String,
}

/// Reprocess request body: the stored source plus a full parameter
/// snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReprocessRequest {
    /// Reference returned by the original upload.
    pub source_reference: String,
    /// Vectorization mode (`"color"` or `"bw"`).
    pub mode: TransformMode,
    /// Color count for color mode.
    pub color_count: u32,
    /// Simplification tolerance.
    pub simplify_tolerance: f64,
    /// Background/binarization threshold. The reprocess body uses
    /// `bg_threshold`; only the upload form field is named `threshold`.
    pub bg_threshold: u8,
    /// Whether to remove the background before tracing.
    pub remove_background: bool,
}

impl ReprocessRequest {
    /// Assemble a request from a source reference and parameter snapshot.
    #[must_use]
    pub fn new(source_reference: String, params: &TransformParams) -> Self {
        Self {
            source_reference,
            mode: params.mode,
            color_count: params.color_count,
            simplify_tolerance: params.simplify_tolerance,
            bg_threshold: params.bg_threshold,
            remove_background: params.remove_background,
        }
    }
}

/// Error response body from either operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message for the surfaced error channel.
    pub error: String,
}

/// The vector result currently displayed, replacing any prior result
/// wholesale.
///
/// Assembled by the transport layer after the follow-up content fetch,
/// so by the time the engine sees one it is complete and displayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArtifact {
    /// The vector markup (SVG text).
    pub vector_content: String,
    /// URL for downloading the generated file.
    pub download_url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upload_response_parses_service_body() {
        let body = r#"{
            "source_reference": "5f1e-cat.png",
            "vector_content_url": "/output/5f1e.svg",
            "download_url": "/download/5f1e.svg"
        }"#;
        let resp: UploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.source_reference, "5f1e-cat.png");
        assert_eq!(resp.vector_content_url, "/output/5f1e.svg");
    }

    #[test]
    fn reprocess_response_has_no_source_reference() {
        let body = r#"{
            "vector_content_url": "/output/9a2b.svg",
            "download_url": "/download/9a2b.svg"
        }"#;
        let resp: ReprocessResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.download_url, "/download/9a2b.svg");
    }

    #[test]
    fn reprocess_request_carries_full_snapshot() {
        let mut params = TransformParams::default();
        params.apply(crate::params::ParamEdit::ColorCount(3));
        let req = ReprocessRequest::new("5f1e-cat.png".into(), &params);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["source_reference"], "5f1e-cat.png");
        assert_eq!(json["mode"], "color");
        assert_eq!(json["color_count"], 3);
        // The reprocess body's field is bg_threshold, unlike the
        // upload form's threshold field.
        assert_eq!(json["bg_threshold"], 128);
        assert!(json.get("threshold").is_none());
        assert_eq!(json["remove_background"], false);
    }

    #[test]
    fn error_response_parses_message() {
        let resp: ErrorResponse =
            serde_json::from_str(r#"{"error": "vectorization failed"}"#).unwrap();
        assert_eq!(resp.error, "vectorization failed");
    }
}
