use dioxus::prelude::*;
use vekta_engine::{DEBOUNCE_QUIET_PERIOD, ParamEdit, PreviewEngine};
use vekta_io::{download, raster, FileUpload, ParamControls, PreviewPane, TransformService};

/// Debounce quiet period in milliseconds, for the timer API.
#[allow(clippy::cast_possible_truncation)]
const QUIET_MS: u32 = DEBOUNCE_QUIET_PERIOD.as_millis() as u32;

fn main() {
    dioxus::launch(app);
}

/// Root application component.
///
/// Owns the preview engine in a signal and wires together the upload
/// zone, parameter controls, and preview pane. All sequencing decisions
/// (debounce, staleness, viewer lifecycle) live in the engine; this
/// component only performs the timers and network round trips the
/// engine asks for.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // All client-side state for the session.
    let mut engine = use_signal(PreviewEngine::new);

    // Blob URL for the original raster image, shown beside the vector
    // preview. Revoked on replacement.
    let mut original_url = use_signal(|| Option::<String>::None);

    // --- File selection handler ---
    let on_select = move |(bytes, name): (Vec<u8>, String)| {
        let Ok(command) = engine.write().select_file(&name, bytes) else {
            // Validation failure: surfaced via the engine's error
            // channel, nothing to send.
            return;
        };

        // Refresh the original-image preview from the accepted bytes.
        if let Some(ref old) = original_url.take() {
            raster::revoke_blob_url(old);
        }
        match raster::image_bytes_to_blob_url(&command.bytes) {
            Ok(url) => original_url.set(Some(url)),
            Err(e) => {
                web_sys::console::warn_1(&format!("original preview unavailable: {e}").into());
            }
        }

        spawn(async move {
            let service = TransformService::new("");
            match service
                .upload(&command.filename, &command.bytes, &command.params)
                .await
            {
                Ok((reference, artifact)) => {
                    engine.write().apply_upload(command.ticket, reference, artifact);
                }
                Err(e) => engine.write().apply_failure(command.ticket, e),
            }
        });
    };

    // --- Parameter edit handler ---
    // Every edit lands immediately (control visibility updates in the
    // same render); the network call waits out the quiet period and
    // fires only if no later edit superseded this one.
    let on_edit = move |edit: ParamEdit| {
        let Some(token) = engine.write().apply_edit(edit) else {
            return;
        };
        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(QUIET_MS).await;
            let Some(command) = engine.write().debounce_elapsed(token) else {
                return;
            };
            let service = TransformService::new("");
            match service.reprocess(&command.source, &command.params).await {
                Ok(artifact) => {
                    engine.write().apply_reprocess(command.ticket, artifact);
                }
                Err(e) => engine.write().apply_failure(command.ticket, e),
            }
        });
    };

    // --- Pan/zoom handlers ---
    let on_zoom = move |factor: f64| {
        if let Some(view) = engine.write().view_mut() {
            view.zoom_by(factor);
        }
    };
    let on_pan = move |(dx, dy): (f64, f64)| {
        if let Some(view) = engine.write().view_mut() {
            view.pan_by(dx, dy);
        }
    };

    // --- Download handler ---
    let on_download = move |_| {
        let eng = engine.read();
        let Some(mounted) = eng.preview() else {
            return;
        };
        let base = eng.source_filename().map_or("output", |name| {
            name.rsplit_once('.').map_or(name, |(stem, _)| stem)
        });
        let filename = format!("{base}.svg");
        if let Err(e) = download::download_svg(&mounted.artifact.vector_content, &filename) {
            web_sys::console::warn_1(&format!("download failed: {e}").into());
        }
    };

    // --- Render snapshot ---
    // Clone the pieces the layout needs out of the engine so no borrow
    // is held across the rsx! handlers.
    let (params, visibility, mounted, mount_id, in_flight, error, has_source) = {
        let eng = engine.read();
        (
            eng.params().clone(),
            eng.visible_controls(),
            eng.preview().map(|m| (m.artifact.vector_content.clone(), m.view.css())),
            eng.mount_id(),
            eng.in_flight(),
            eng.last_error().map(ToString::to_string),
            eng.source_filename().is_some(),
        )
    };

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/style.css") }

        div { class: "min-h-screen bg-(--bg) text-(--text) flex flex-col",
            // Header
            header { class: "px-6 py-4 border-b border-(--border)",
                h1 { class: "text-2xl font-semibold", "vekta" }
                p { class: "text-(--muted) text-sm",
                    "Convert raster images to SVG with live parameter preview"
                }
            }

            // Main content area
            div { class: "flex-1 flex flex-col lg:flex-row gap-6 p-6",
                // Left column: vector preview
                div { class: "flex-1 flex flex-col gap-4",
                    if let Some((ref content, ref view_css)) = mounted {
                        PreviewPane {
                            vector_content: content.clone(),
                            view_css: view_css.clone(),
                            mount_id: mount_id,
                            on_zoom: on_zoom,
                            on_pan: on_pan,
                        }

                        div { class: "flex justify-end",
                            button {
                                class: "px-4 py-2 rounded bg-[var(--btn-primary)] text-white text-sm",
                                onclick: on_download,
                                "Download SVG"
                            }
                        }
                    } else if in_flight {
                        div { class: "flex-1 flex items-center justify-center",
                            p { class: "text-(--text-secondary) text-lg animate-pulse",
                                "Processing..."
                            }
                        }
                    } else {
                        div { class: "flex-1 flex items-center justify-center",
                            p { class: "text-(--text-placeholder) text-lg",
                                "Upload an image to get started"
                            }
                        }
                    }

                    // An in-flight reprocess keeps the previous preview
                    // mounted; signal progress without hiding it.
                    if in_flight && mounted.is_some() {
                        p { class: "text-(--text-secondary) text-sm animate-pulse",
                            "Updating preview..."
                        }
                    }

                    // Error display
                    if let Some(ref err) = error {
                        div { class: "bg-(--error-bg) border border-(--error-border) rounded p-3",
                            p { class: "text-(--text-error) text-sm", "{err}" }
                        }
                    }
                }

                // Right sidebar: original image + controls
                div { class: "lg:w-80 flex-shrink-0 flex flex-col gap-4",
                    if let Some(ref url) = original_url() {
                        if has_source {
                            div { class: "bg-[var(--surface)] rounded p-3",
                                h3 { class: "text-sm font-semibold text-[var(--text-heading)] mb-2",
                                    "Original"
                                }
                                img {
                                    src: "{url}",
                                    class: "w-full h-auto max-h-48 rounded object-contain",
                                    alt: "Original image",
                                }
                            }
                        }
                    }

                    div { class: "bg-[var(--surface)] rounded p-4",
                        h3 { class: "text-sm font-semibold text-[var(--text-heading)] mb-3",
                            "Settings"
                        }
                        ParamControls {
                            params: params,
                            visibility: visibility,
                            on_edit: on_edit,
                        }
                    }
                }
            }

            // Footer: upload zone
            div { class: "px-6 pb-6",
                FileUpload {
                    on_select: on_select,
                }
            }
        }
    }
}
