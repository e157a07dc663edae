//! PSD Layer Splitter - per-layer PNG export engine
//!
//! Splits a layered PSD document into one PNG file per raster layer.
//! Export naming is deterministic: every leaf gets a zero-padded positional
//! path (`000`, `000_001`, ...) derived from its place in the layer tree,
//! so repeated runs over the same document produce the same files.
//!
//! Optional transforms, applied per leaf in this order:
//! 1. Reprojection onto the document canvas rectangle (`--canvas-bounds`)
//! 2. Alpha compositing against a solid background color (`--bgcolor`)

pub mod color;
pub mod compose;
pub mod decode;
pub mod document;
pub mod pipeline;
pub mod raster;
pub mod walk;

pub use color::resolve_color;
pub use document::{Document, Layer};
pub use pipeline::{ExportConfig, ExportError, ExportPipeline, ExportReport, ExportedFile};
pub use raster::{PixelBuffer, Rect, Rgba64};
pub use walk::{FilePngSink, LayerWalker, PngSink};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
