//! Transform parameters and derived control visibility.
//!
//! [`TransformParams`] is the full parameter snapshot sent with every
//! upload and reprocess request. All setters clamp out-of-range values
//! so the stored state is valid after every call -- the UI never has to
//! pre-validate slider input.

use serde::{Deserialize, Serialize};

/// Inclusive color count range accepted by the transform service.
pub const COLOR_COUNT_RANGE: (u32, u32) = (2, 32);

/// Inclusive simplify tolerance range. Higher removes more detail.
pub const SIMPLIFY_TOLERANCE_RANGE: (f64, f64) = (0.0, 10.0);

/// Vectorization mode.
///
/// Wire values match the transform service: `"color"` and `"bw"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformMode {
    /// Multi-color tracing. Uses `color_count`.
    #[serde(rename = "color")]
    Color,
    /// Black and white tracing. Uses `bg_threshold` as the binarization
    /// threshold.
    #[serde(rename = "bw")]
    BlackAndWhite,
}

/// Full transform parameter snapshot.
///
/// Owned by the parameter store; each field change is a candidate
/// trigger for a reprocess request. Field invariants:
///
/// - `color_count` is meaningful only when `mode` is [`TransformMode::Color`]
/// - `bg_threshold` applies in black/white mode, and in color mode when
///   `remove_background` is set
///
/// Both invariants are surfaced to the UI via [`TransformParams::visible_controls`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformParams {
    /// Vectorization mode.
    pub mode: TransformMode,

    /// Number of colors to quantize to in color mode.
    /// Clamped to [`COLOR_COUNT_RANGE`].
    pub color_count: u32,

    /// Path simplification tolerance. Higher values remove more points,
    /// producing simpler output. Clamped to [`SIMPLIFY_TOLERANCE_RANGE`].
    pub simplify_tolerance: f64,

    /// Background/binarization threshold (0-255).
    pub bg_threshold: u8,

    /// Whether to remove the image background before tracing
    /// (color mode only; black/white mode always thresholds).
    pub remove_background: bool,
}

impl Default for TransformParams {
    fn default() -> Self {
        Self {
            mode: TransformMode::Color,
            color_count: 8,
            simplify_tolerance: 1.0,
            bg_threshold: 128,
            remove_background: false,
        }
    }
}

/// A single parameter mutation, as fired by a UI control.
///
/// Gives the controls component one event type to emit; the store
/// dispatches to the matching clamping setter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamEdit {
    /// Switch vectorization mode.
    Mode(TransformMode),
    /// Set the color count (clamped).
    ColorCount(i64),
    /// Set the simplify tolerance (clamped; NaN is treated as the minimum).
    SimplifyTolerance(f64),
    /// Set the background threshold (clamped to 0-255).
    BgThreshold(i64),
    /// Toggle background removal.
    RemoveBackground(bool),
}

/// Which parameter controls should currently be shown.
///
/// Recomputed synchronously from the stored parameters on every read --
/// there is no cached state to lag behind a mode change. Controls not
/// listed here (mode, simplify tolerance, background removal) are
/// always visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlVisibility {
    /// Color count slider: color mode only.
    pub color_count: bool,
    /// Background threshold slider: black/white mode, or color mode
    /// with background removal enabled.
    pub bg_threshold: bool,
}

impl TransformParams {
    /// Apply a single edit, clamping the value into range.
    pub fn apply(&mut self, edit: ParamEdit) {
        match edit {
            ParamEdit::Mode(mode) => self.mode = mode,
            ParamEdit::ColorCount(n) => self.set_color_count(n),
            ParamEdit::SimplifyTolerance(t) => self.set_simplify_tolerance(t),
            ParamEdit::BgThreshold(t) => self.set_bg_threshold(t),
            ParamEdit::RemoveBackground(on) => self.remove_background = on,
        }
    }

    /// Set the color count, clamped to [`COLOR_COUNT_RANGE`].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_color_count(&mut self, n: i64) {
        let (lo, hi) = COLOR_COUNT_RANGE;
        self.color_count = n.clamp(i64::from(lo), i64::from(hi)) as u32;
    }

    /// Set the simplify tolerance, clamped to [`SIMPLIFY_TOLERANCE_RANGE`].
    ///
    /// NaN (possible from a bad slider parse upstream) clamps to the
    /// range minimum so the stored state stays valid.
    pub fn set_simplify_tolerance(&mut self, tolerance: f64) {
        let (lo, hi) = SIMPLIFY_TOLERANCE_RANGE;
        self.simplify_tolerance = if tolerance.is_nan() {
            lo
        } else {
            tolerance.clamp(lo, hi)
        };
    }

    /// Set the background threshold, clamped to 0-255.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_bg_threshold(&mut self, threshold: i64) {
        self.bg_threshold = threshold.clamp(0, 255) as u8;
    }

    /// Derive which controls are visible for the current parameters.
    #[must_use]
    pub const fn visible_controls(&self) -> ControlVisibility {
        let color = matches!(self.mode, TransformMode::Color);
        ControlVisibility {
            color_count: color,
            bg_threshold: !color || self.remove_background,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = TransformParams::default();
        assert_eq!(p.mode, TransformMode::Color);
        assert_eq!(p.color_count, 8);
        assert!((p.simplify_tolerance - 1.0).abs() < f64::EPSILON);
        assert_eq!(p.bg_threshold, 128);
        assert!(!p.remove_background);
    }

    #[test]
    fn color_count_clamps_both_ends() {
        let mut p = TransformParams::default();
        p.set_color_count(1);
        assert_eq!(p.color_count, 2);
        p.set_color_count(-50);
        assert_eq!(p.color_count, 2);
        p.set_color_count(33);
        assert_eq!(p.color_count, 32);
        p.set_color_count(16);
        assert_eq!(p.color_count, 16);
    }

    #[test]
    fn simplify_tolerance_clamps_and_handles_nan() {
        let mut p = TransformParams::default();
        p.set_simplify_tolerance(-1.0);
        assert!((p.simplify_tolerance - 0.0).abs() < f64::EPSILON);
        p.set_simplify_tolerance(99.0);
        assert!((p.simplify_tolerance - 10.0).abs() < f64::EPSILON);
        p.set_simplify_tolerance(f64::NAN);
        assert!((p.simplify_tolerance - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bg_threshold_clamps_to_byte_range() {
        let mut p = TransformParams::default();
        p.set_bg_threshold(-1);
        assert_eq!(p.bg_threshold, 0);
        p.set_bg_threshold(300);
        assert_eq!(p.bg_threshold, 255);
        p.set_bg_threshold(77);
        assert_eq!(p.bg_threshold, 77);
    }

    #[test]
    fn apply_dispatches_every_edit() {
        let mut p = TransformParams::default();
        p.apply(ParamEdit::Mode(TransformMode::BlackAndWhite));
        p.apply(ParamEdit::ColorCount(5));
        p.apply(ParamEdit::SimplifyTolerance(3.5));
        p.apply(ParamEdit::BgThreshold(200));
        p.apply(ParamEdit::RemoveBackground(true));
        assert_eq!(p.mode, TransformMode::BlackAndWhite);
        assert_eq!(p.color_count, 5);
        assert!((p.simplify_tolerance - 3.5).abs() < f64::EPSILON);
        assert_eq!(p.bg_threshold, 200);
        assert!(p.remove_background);
    }

    #[test]
    fn color_count_visible_only_in_color_mode() {
        let mut p = TransformParams::default();
        assert!(p.visible_controls().color_count);
        p.apply(ParamEdit::Mode(TransformMode::BlackAndWhite));
        assert!(!p.visible_controls().color_count);
    }

    #[test]
    fn bg_threshold_visibility_follows_mode_and_removal() {
        let mut p = TransformParams::default();
        // Color mode, removal off: hidden.
        assert!(!p.visible_controls().bg_threshold);
        // Color mode, removal on: visible.
        p.apply(ParamEdit::RemoveBackground(true));
        assert!(p.visible_controls().bg_threshold);
        // BW mode: always visible, regardless of removal.
        p.apply(ParamEdit::Mode(TransformMode::BlackAndWhite));
        p.apply(ParamEdit::RemoveBackground(false));
        assert!(p.visible_controls().bg_threshold);
    }

    #[test]
    fn visibility_updates_synchronously_with_mode_switch() {
        // Switching color -> bw flips both derived visibilities in the
        // same call, with no intervening event needed.
        let mut p = TransformParams::default();
        let before = p.visible_controls();
        assert!(before.color_count && !before.bg_threshold);
        p.apply(ParamEdit::Mode(TransformMode::BlackAndWhite));
        let after = p.visible_controls();
        assert!(!after.color_count && after.bg_threshold);
    }

    #[test]
    fn mode_serializes_to_service_wire_values() {
        assert_eq!(
            serde_json::to_string(&TransformMode::Color).unwrap(),
            "\"color\""
        );
        assert_eq!(
            serde_json::to_string(&TransformMode::BlackAndWhite).unwrap(),
            "\"bw\""
        );
    }

    #[test]
    fn params_serde_round_trip() {
        let p = TransformParams {
            mode: TransformMode::BlackAndWhite,
            color_count: 12,
            simplify_tolerance: 2.5,
            bg_threshold: 40,
            remove_background: true,
        };
        let json = serde_json::to_string(&p).unwrap();
        let back: TransformParams = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
