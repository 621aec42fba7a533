//! vekta-io: Browser I/O and Dioxus component library.
//!
//! Handles file uploads, the HTTP transport to the transform service,
//! Blob downloads, raster preview encoding, and provides reusable UI
//! components for the vekta web application.

pub mod components;
pub mod download;
pub mod raster;
pub mod transport;

pub use components::{FileUpload, ParamControls, PreviewPane};
pub use transport::TransformService;
