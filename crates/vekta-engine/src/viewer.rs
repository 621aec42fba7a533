//! Viewer adapter: ownership of the mounted preview and its view state.
//!
//! The rendered SVG surface is replaced, not incrementally updated, so
//! the viewer owns an at-most-one mounted instance and tears the old
//! one down itself on every [`PreviewViewer::mount`]. Pan/zoom state
//! never survives a replacement: each mount starts fit-to-container,
//! centered, at unit zoom.

use crate::protocol::PreviewArtifact;

/// Zoom factor bounds for the interactive preview.
pub const ZOOM_RANGE: (f64, f64) = (0.1, 10.0);

/// Pan/zoom transform applied to the mounted preview.
///
/// `Default` is the initial view: unit zoom, no pan, which together
/// with the container's fit/center layout shows the whole artifact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    /// Scale factor, clamped to [`ZOOM_RANGE`].
    pub zoom: f64,
    /// Horizontal pan offset in container pixels.
    pub pan_x: f64,
    /// Vertical pan offset in container pixels.
    pub pan_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Multiply the zoom by `factor`, clamped to [`ZOOM_RANGE`].
    ///
    /// Non-finite or non-positive factors are ignored so a bad wheel
    /// delta cannot corrupt the view.
    pub fn zoom_by(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let (lo, hi) = ZOOM_RANGE;
        self.zoom = (self.zoom * factor).clamp(lo, hi);
    }

    /// Shift the pan offset by `(dx, dy)` container pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    /// CSS `transform` value for the wrapper element.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.pan_x, self.pan_y, self.zoom
        )
    }
}

/// One mounted preview instance.
#[derive(Debug, Clone, PartialEq)]
pub struct MountedPreview {
    /// The artifact being displayed.
    pub artifact: PreviewArtifact,
    /// Current pan/zoom state for this instance.
    pub view: ViewTransform,
}

/// Owns the at-most-one mounted preview instance.
#[derive(Debug, Default)]
pub struct PreviewViewer {
    mounted: Option<MountedPreview>,
    /// Incremented on every mount. The rendering layer keys its DOM
    /// subtree on this so event listeners and scroll state from the
    /// previous instance are destroyed rather than reused.
    mount_id: u64,
}

impl PreviewViewer {
    /// Create a viewer with nothing mounted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a new artifact, replacing any previous instance.
    ///
    /// Valid to call repeatedly with no intervening
    /// [`unmount`](Self::unmount); the teardown of the old instance
    /// happens here.
    /// The view transform is re-established at its initial state on
    /// every mount.
    pub fn mount(&mut self, artifact: PreviewArtifact) {
        self.mounted = Some(MountedPreview {
            artifact,
            view: ViewTransform::default(),
        });
        self.mount_id += 1;
    }

    /// Tear down the mounted instance, if any.
    pub fn unmount(&mut self) {
        self.mounted = None;
        self.mount_id += 1;
    }

    /// The mounted preview, if any.
    #[must_use]
    pub fn mounted(&self) -> Option<&MountedPreview> {
        self.mounted.as_ref()
    }

    /// Mutable view transform of the mounted preview, if any.
    pub fn view_mut(&mut self) -> Option<&mut ViewTransform> {
        self.mounted.as_mut().map(|m| &mut m.view)
    }

    /// Identity of the current mount, for keyed rendering.
    #[must_use]
    pub const fn mount_id(&self) -> u64 {
        self.mount_id
    }
}
