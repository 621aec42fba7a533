//! Interactive preview viewer for the vectorized artifact.
//!
//! Renders the SVG markup returned by the transform service inside a
//! pan/zoom surface. The DOM subtree is keyed on the engine's mount
//! identity, so replacing the artifact destroys the old element tree
//! (and with it any listeners and scroll state) instead of mutating it
//! in place. Pan and zoom intents are forwarded to the caller, which
//! applies them to the engine's view state; the component itself holds
//! only transient drag-tracking state.

use dioxus::prelude::*;

/// Props for the [`PreviewPane`] component.
#[derive(Props, Clone, PartialEq)]
pub struct PreviewPaneProps {
    /// SVG markup to display.
    vector_content: String,
    /// CSS `transform` value for the current pan/zoom state.
    view_css: String,
    /// Mount identity; a new value remounts the whole subtree.
    mount_id: u64,
    /// Zoom intent: a multiplicative factor (wheel up > 1, down < 1).
    on_zoom: EventHandler<f64>,
    /// Pan intent in container pixels.
    on_pan: EventHandler<(f64, f64)>,
}

/// Wheel step per notch. One notch up multiplies zoom by this factor.
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Pan/zoom surface around the mounted SVG artifact.
///
/// Wheel events zoom; pointer drag pans. The inner wrapper carries the
/// CSS transform, the outer container clips and centers it, so a fresh
/// mount (identity transform) shows the whole artifact fit and
/// centered.
#[component]
pub fn PreviewPane(props: PreviewPaneProps) -> Element {
    // Last pointer position while a drag is active. Lives and dies with
    // the keyed subtree, so a remount always starts un-dragged.
    let mut drag_origin: Signal<Option<(f64, f64)>> = use_signal(|| None);

    let on_zoom = props.on_zoom;
    let on_pan = props.on_pan;

    rsx! {
        div {
            key: "{props.mount_id}",
            class: "relative w-full h-[70vh] overflow-hidden rounded
                    bg-[var(--preview-bg)] flex items-center justify-center
                    cursor-grab select-none",

            onwheel: move |e| {
                e.prevent_default();
                let delta = e.delta().strip_units().y;
                let factor = if delta < 0.0 {
                    WHEEL_ZOOM_STEP
                } else {
                    1.0 / WHEEL_ZOOM_STEP
                };
                on_zoom.call(factor);
            },
            onmousedown: move |e| {
                let p = e.client_coordinates();
                drag_origin.set(Some((p.x, p.y)));
            },
            onmousemove: move |e| {
                let origin = *drag_origin.peek();
                if let Some((ox, oy)) = origin {
                    let p = e.client_coordinates();
                    drag_origin.set(Some((p.x, p.y)));
                    on_pan.call((p.x - ox, p.y - oy));
                }
            },
            onmouseup: move |_| drag_origin.set(None),
            onmouseleave: move |_| drag_origin.set(None),

            div {
                class: "w-full h-full flex items-center justify-center
                        [&>svg]:max-w-full [&>svg]:max-h-full",
                style: "transform: {props.view_css}; transform-origin: center;",
                dangerous_inner_html: "{props.vector_content}",
            }
        }
    }
}
