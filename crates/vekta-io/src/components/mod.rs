//! Dioxus UI components for vekta.
//!
//! Provides the file upload button and drag overlay, the transform
//! parameter controls, and the pan/zoom preview viewer.

mod controls;
mod upload;
mod viewer;

pub use controls::ParamControls;
pub use upload::FileUpload;
pub use viewer::PreviewPane;
