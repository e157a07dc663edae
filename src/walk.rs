//! Depth-first layer walk: filtering, transform, and export of every leaf.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::compose::{composite, reproject};
use crate::document::Layer;
use crate::pipeline::{ExportError, ExportedFile};
use crate::raster::{PixelBuffer, Rect, Rgba64};

/// Per-run transform settings, resolved once before the walk starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Composite every leaf against this color.
    pub bgcolor: Option<Rgba64>,
    /// Reproject every leaf onto this rectangle before compositing.
    pub canvas: Option<Rect>,
}

/// Encoder seam: serializes a pixel surface to a PNG file.
pub trait PngSink {
    fn write(&mut self, path: &Path, surface: &PixelBuffer) -> Result<(), ExportError>;
}

/// Default sink: 16-bit RGBA PNG on the filesystem.
pub struct FilePngSink;

impl PngSink for FilePngSink {
    fn write(&mut self, path: &Path, surface: &PixelBuffer) -> Result<(), ExportError> {
        let bounds = surface.bounds();
        let mut img =
            image::ImageBuffer::<image::Rgba<u16>, Vec<u16>>::new(bounds.width, bounds.height);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let c = surface.pixel(bounds.left + x as i32, bounds.top + y as i32);
            *px = image::Rgba([c.r, c.g, c.b, c.a]);
        }
        img.save(path)?;
        Ok(())
    }
}

/// Recursive exporter over one root layer's subtree.
///
/// Children are visited before their parent, in document order. The i-th
/// child extends the path stem with `_{i:03}` and the display path with
/// `/name`, which keeps output paths unique and lexicographically sortable
/// for up to 1000 siblings per level (wider sibling lists would break the
/// padding width; not handled).
///
/// A child error aborts the remaining siblings at that level and propagates
/// to the caller. The per-root-layer loop in the pipeline is the only place
/// errors are caught.
pub struct LayerWalker<'a, S: PngSink> {
    options: &'a WalkOptions,
    sink: &'a mut S,
    pub exported: Vec<ExportedFile>,
    pub warnings: Vec<String>,
}

impl<'a, S: PngSink> LayerWalker<'a, S> {
    pub fn new(options: &'a WalkOptions, sink: &'a mut S) -> Self {
        Self { options, sink, exported: Vec::new(), warnings: Vec::new() }
    }

    /// Export `layer`'s subtree. `stem` is the output path without the
    /// `.png` suffix; `display` is the `/`-joined ancestor-name path.
    pub fn walk(&mut self, layer: &Layer, stem: &str, display: &str) -> Result<(), ExportError> {
        for (i, child) in layer.children.iter().enumerate() {
            let child_stem = format!("{stem}_{i:03}");
            let child_display = format!("{display}/{}", child.name);
            self.walk(child, &child_stem, &child_display)?;
        }

        // Pure container: grouping only, nothing to export.
        let Some(surface) = &layer.surface else {
            return Ok(());
        };
        if surface.bounds().is_empty() {
            println!("[warn] empty layer: {display}");
            self.warnings.push(format!("empty layer: {display} ({stem})"));
            return Ok(());
        }

        println!("{display} -> {stem}.png");

        let mut out = Cow::Borrowed(surface);
        if let Some(canvas) = self.options.canvas {
            out = Cow::Owned(reproject(canvas, &out));
        }
        if let Some(bg) = self.options.bgcolor {
            out = Cow::Owned(composite(&out, bg));
        }

        let path = PathBuf::from(format!("{stem}.png"));
        self.sink.write(&path, &out)?;

        let bounds = out.bounds();
        self.exported.push(ExportedFile {
            path: path.to_string_lossy().into_owned(),
            layer: display.to_string(),
            size: [bounds.width, bounds.height],
            sha256: String::new(), // filled in once the file is on disk
        });
        Ok(())
    }
}
