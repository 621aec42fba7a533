//! Transform parameter controls.
//!
//! Renders the mode selector, sliders, and background-removal toggle.
//! Which controls appear is driven entirely by the engine's derived
//! [`ControlVisibility`] -- the component holds no visibility logic of
//! its own, so a mode switch updates the control set in the same
//! render pass.

use dioxus::prelude::*;

use vekta_engine::params::{COLOR_COUNT_RANGE, SIMPLIFY_TOLERANCE_RANGE};
use vekta_engine::{ControlVisibility, ParamEdit, TransformMode, TransformParams};

/// Props for the [`ParamControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ParamControlsProps {
    /// Current parameter snapshot (read-only).
    params: TransformParams,
    /// Which optional controls to show.
    visibility: ControlVisibility,
    /// Callback fired for every parameter change.
    on_edit: EventHandler<ParamEdit>,
}

/// Renders the transform parameter controls.
///
/// - **Mode**: color / black & white select, always visible
/// - **Colors**: color count slider, color mode only
/// - **Detail**: simplify tolerance slider, always visible
/// - **Remove background**: toggle, always visible
/// - **Threshold**: background threshold slider, per visibility rule
#[component]
pub fn ParamControls(props: ParamControlsProps) -> Element {
    let params = &props.params;
    let on_edit = props.on_edit;
    let threshold_label = match params.mode {
        TransformMode::Color => "Threshold (color)",
        TransformMode::BlackAndWhite => "Threshold (b/w)",
    };

    rsx! {
        div { class: "space-y-2",
            {render_select(
                "mode",
                "Mode",
                &[("color", "Color"), ("bw", "Black & White")],
                match params.mode {
                    TransformMode::Color => "color",
                    TransformMode::BlackAndWhite => "bw",
                },
                move |v: String| {
                    let mode = if v == "bw" {
                        TransformMode::BlackAndWhite
                    } else {
                        TransformMode::Color
                    };
                    on_edit.call(ParamEdit::Mode(mode));
                },
            )}

            if props.visibility.color_count {
                {render_slider(
                    "color_count",
                    "Colors",
                    f64::from(params.color_count),
                    f64::from(COLOR_COUNT_RANGE.0),
                    f64::from(COLOR_COUNT_RANGE.1),
                    1.0,
                    0,
                    move |v: f64| {
                        #[allow(clippy::cast_possible_truncation)]
                        on_edit.call(ParamEdit::ColorCount(v as i64));
                    },
                )}
            }

            {render_slider(
                "simplify_tolerance",
                "Detail",
                params.simplify_tolerance,
                SIMPLIFY_TOLERANCE_RANGE.0,
                SIMPLIFY_TOLERANCE_RANGE.1,
                0.1,
                1,
                move |v: f64| {
                    on_edit.call(ParamEdit::SimplifyTolerance(v));
                },
            )}

            {render_toggle(
                "remove_background",
                "Remove background",
                params.remove_background,
                move |v: bool| {
                    on_edit.call(ParamEdit::RemoveBackground(v));
                },
            )}

            if props.visibility.bg_threshold {
                {render_slider(
                    "bg_threshold",
                    threshold_label,
                    f64::from(params.bg_threshold),
                    0.0,
                    255.0,
                    1.0,
                    0,
                    move |v: f64| {
                        #[allow(clippy::cast_possible_truncation)]
                        on_edit.call(ParamEdit::BgThreshold(v as i64));
                    },
                )}
            }
        }
    }
}

/// Render a labeled range slider.
#[allow(clippy::too_many_arguments)]
fn render_slider(
    id: &str,
    label: &str,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
    decimals: usize,
    on_input: impl Fn(f64) + 'static,
) -> Element {
    let display = format!("{value:.decimals$}");
    let id = id.to_string();
    let label = label.to_string();

    rsx! {
        div { class: "flex flex-col gap-1",
            div { class: "flex justify-between text-sm",
                label { r#for: "{id}",
                    class: "text-[var(--text-heading)] font-medium",
                    "{label}"
                }
                span { class: "text-[var(--text-secondary)] tabular-nums",
                    "{display}"
                }
            }
            input {
                r#type: "range",
                id: "{id}",
                min: "{min}",
                max: "{max}",
                step: "{step}",
                value: "{value}",
                class: "w-full accent-[var(--btn-primary)]",
                oninput: move |e| {
                    match e.value().parse::<f64>() {
                        Ok(v) => on_input(v),
                        Err(err) => {
                            web_sys::console::warn_1(
                                &format!("slider parse failure: {err:?} from {:?}", e.value())
                                    .into(),
                            );
                        }
                    }
                },
            }
        }
    }
}

/// Render a labeled toggle (checkbox styled as switch).
fn render_toggle(
    id: &str,
    label: &str,
    checked: bool,
    on_change: impl Fn(bool) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();

    rsx! {
        div { class: "flex items-center justify-between",
            label { r#for: "{id}",
                class: "text-sm text-[var(--text-heading)] font-medium",
                "{label}"
            }
            input {
                r#type: "checkbox",
                id: "{id}",
                checked: checked,
                class: "w-5 h-5 accent-[var(--btn-primary)]",
                onchange: move |e| {
                    on_change(e.checked());
                },
            }
        }
    }
}

/// Render a labeled select dropdown.
fn render_select(
    id: &str,
    label: &str,
    options: &[(&str, &str)],
    selected: &str,
    on_change: impl Fn(String) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();
    let options: Vec<(String, String)> = options
        .iter()
        .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
        .collect();
    let selected = selected.to_string();

    rsx! {
        div { class: "flex flex-col gap-1",
            label { r#for: "{id}",
                class: "text-sm text-[var(--text-heading)] font-medium",
                "{label}"
            }
            select {
                id: "{id}",
                class: "px-2 py-1 rounded border border-[var(--border)] bg-[var(--surface)]
                        text-[var(--text)] text-sm",
                value: "{selected}",
                onchange: move |e| {
                    on_change(e.value());
                },

                for (value, display) in options.iter() {
                    option {
                        value: "{value}",
                        selected: value == &selected,
                        "{display}"
                    }
                }
            }
        }
    }
}
