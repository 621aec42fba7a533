//! HTTP transport to the transform service.
//!
//! Wraps the two service operations behind async methods on
//! [`TransformService`]. Both operations finish by fetching the vector
//! markup from the URL the service returns, so callers receive a
//! complete, displayable [`PreviewArtifact`] -- the follow-up GET is
//! part of the operation, not a separate step.
//!
//! Uses the raw `fetch` API via `web-sys`; every outcome other than a
//! 2xx with a well-formed body maps onto the engine's recoverable
//! error taxonomy.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, RequestInit, Response};

use vekta_engine::{
    EngineError, ErrorResponse, PreviewArtifact, ReprocessRequest, ReprocessResponse, SourceRef,
    TransformParams, UploadResponse,
};

/// Client for the remote transform service.
#[derive(Debug, Clone)]
pub struct TransformService {
    /// Base URL the operation paths are joined onto. Empty means
    /// same-origin relative URLs.
    base_url: String,
}

impl TransformService {
    /// Create a client against `base_url` (no trailing slash; empty for
    /// same-origin).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Upload raw image bytes with a full parameter snapshot.
    ///
    /// Returns the server-assigned source reference together with the
    /// fetched preview artifact.
    ///
    /// # Errors
    ///
    /// [`EngineError::Transport`] for network failures, non-2xx
    /// statuses, and malformed bodies; [`EngineError::ContentFetch`]
    /// when the follow-up vector content GET fails.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
    pub async fn upload(
        &self,
        filename: &str,
        bytes: &[u8],
        params: &TransformParams,
    ) -> Result<(String, PreviewArtifact), EngineError> {
        let form = build_upload_form(filename, bytes, params)
            .map_err(|e| EngineError::Transport(js_error_string(&e)))?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&form);

        let body = self.round_trip("/upload", &opts).await?;
        let resp: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| EngineError::Transport(format!("malformed upload response: {e}")))?;

        let artifact = self
            .fetch_artifact(&resp.vector_content_url, resp.download_url.clone())
            .await?;
        Ok((resp.source_reference, artifact))
    }

    /// Reprocess an uploaded source with a new parameter snapshot.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`upload`](Self::upload).
    #[allow(clippy::future_not_send)]
    pub async fn reprocess(
        &self,
        source: &SourceRef,
        params: &TransformParams,
    ) -> Result<PreviewArtifact, EngineError> {
        let request = ReprocessRequest::new(source.as_str().to_owned(), params);
        let json = serde_json::to_string(&request)
            .map_err(|e| EngineError::Transport(format!("failed to serialize request: {e}")))?;

        let headers = Headers::new().map_err(|e| EngineError::Transport(js_error_string(&e)))?;
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| EngineError::Transport(js_error_string(&e)))?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_headers(headers.as_ref());
        opts.set_body(&JsValue::from_str(&json));

        let body = self.round_trip("/reprocess", &opts).await?;
        let resp: ReprocessResponse = serde_json::from_str(&body)
            .map_err(|e| EngineError::Transport(format!("malformed reprocess response: {e}")))?;

        self.fetch_artifact(&resp.vector_content_url, resp.download_url)
            .await
    }

    /// POST to `path` and return the response body text.
    ///
    /// Non-2xx responses are decoded for the service's `{"error": ...}`
    /// message when present.
    #[allow(clippy::future_not_send)]
    async fn round_trip(&self, path: &str, opts: &RequestInit) -> Result<String, EngineError> {
        let url = format!("{}{path}", self.base_url);
        let response = fetch(&url, opts)
            .await
            .map_err(|e| EngineError::Transport(js_error_string(&e)))?;
        let body = response_text(&response)
            .await
            .map_err(|e| EngineError::Transport(js_error_string(&e)))?;

        if response.ok() {
            Ok(body)
        } else {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map_or_else(|_| format!("status {}", response.status()), |e| e.error);
            Err(EngineError::Transport(message))
        }
    }

    /// GET the vector markup and assemble the preview artifact.
    #[allow(clippy::future_not_send)]
    async fn fetch_artifact(
        &self,
        content_url: &str,
        download_url: String,
    ) -> Result<PreviewArtifact, EngineError> {
        let url = format!("{}{content_url}", self.base_url);
        let opts = RequestInit::new();
        opts.set_method("GET");

        let response = fetch(&url, &opts)
            .await
            .map_err(|e| EngineError::ContentFetch(js_error_string(&e)))?;
        if !response.ok() {
            return Err(EngineError::ContentFetch(format!(
                "status {}",
                response.status()
            )));
        }
        let vector_content = response_text(&response)
            .await
            .map_err(|e| EngineError::ContentFetch(js_error_string(&e)))?;

        Ok(PreviewArtifact {
            vector_content,
            download_url,
        })
    }
}

/// Build the multipart form body for an upload.
///
/// Field names match the service contract: `file`, `mode`,
/// `color_count`, `simplify_tolerance`, `threshold`,
/// `remove_background`.
fn build_upload_form(
    filename: &str,
    bytes: &[u8],
    params: &TransformParams,
) -> Result<FormData, JsValue> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());
    let blob = web_sys::Blob::new_with_buffer_source_sequence(&parts)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename("file", &blob, filename)?;
    form.append_with_str(
        "mode",
        match params.mode {
            vekta_engine::TransformMode::Color => "color",
            vekta_engine::TransformMode::BlackAndWhite => "bw",
        },
    )?;
    form.append_with_str("color_count", &params.color_count.to_string())?;
    form.append_with_str("simplify_tolerance", &params.simplify_tolerance.to_string())?;
    form.append_with_str("threshold", &params.bg_threshold.to_string())?;
    form.append_with_str("remove_background", &params.remove_background.to_string())?;
    Ok(form)
}

/// Run a `fetch` and resolve it to a typed [`Response`].
#[allow(clippy::future_not_send)]
async fn fetch(url: &str, opts: &RequestInit) -> Result<Response, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let value = JsFuture::from(window.fetch_with_str_and_init(url, opts)).await?;
    value
        .dyn_into::<Response>()
        .map_err(|_| JsValue::from_str("fetch did not return a Response"))
}

/// Await a response's text body.
#[allow(clippy::future_not_send)]
async fn response_text(response: &Response) -> Result<String, JsValue> {
    let value = JsFuture::from(response.text()?).await?;
    value
        .as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// Render a `JsValue` error as a display string.
fn js_error_string(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
