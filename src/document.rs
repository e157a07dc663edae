//! Decoded document model: an immutable layer tree plus the canvas rectangle.
//!
//! The decoder builds this once before the export runs; the walker only
//! reads it. Layer names come straight from the document and are neither
//! unique nor path-safe, which is why output naming is positional.

use crate::raster::{PixelBuffer, Rect};

/// A decoded layered document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Root-level layers, first to last.
    pub layers: Vec<Layer>,
    /// Overall document canvas, independent of any layer's own bounds.
    pub canvas: Rect,
}

/// One node of the layer tree.
///
/// `surface: None` marks a pure container (a group); `Some` marks a raster
/// layer, possibly with empty bounds.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub children: Vec<Layer>,
    pub surface: Option<PixelBuffer>,
}

impl Layer {
    /// Container node grouping `children`, no pixel data of its own.
    pub fn group(name: impl Into<String>, children: Vec<Layer>) -> Self {
        Self { name: name.into(), children, surface: None }
    }

    /// Leaf raster layer.
    pub fn image(name: impl Into<String>, surface: PixelBuffer) -> Self {
        Self { name: name.into(), children: Vec::new(), surface: Some(surface) }
    }

    pub fn has_image(&self) -> bool {
        self.surface.is_some()
    }
}
