//! PSD adapter: turns a PSD file into the [`Document`] tree.
//!
//! The `psd` crate hands back image layers in document order plus an
//! id-keyed table of groups; this module reassembles them into an owned
//! tree and widens the 8-bit channels to the 16-bit range the rest of the
//! pipeline works in. Only the layer hierarchy is exposed - the flattened
//! merged preview is never part of the tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use psd::Psd;

use crate::color::widen;
use crate::document::{Document, Layer};
use crate::pipeline::ExportError;
use crate::raster::{PixelBuffer, Rect, Rgba64};

/// Read and decode `path`. Any read or parse failure is fatal.
pub fn decode_document(path: &Path) -> Result<Document, ExportError> {
    let bytes = fs::read(path)?;
    let psd = Psd::from_bytes(&bytes).map_err(|e| ExportError::Decode(e.to_string()))?;

    let canvas = Rect::new(0, 0, psd.width(), psd.height());

    // Group nodes, keyed by the parser-assigned id. Ids increase in the
    // order the group records appear in the file.
    let mut groups: BTreeMap<u32, Layer> = BTreeMap::new();
    let mut group_parents: BTreeMap<u32, Option<u32>> = BTreeMap::new();
    for (id, group) in psd.groups() {
        groups.insert(*id, Layer::group(group.name(), Vec::new()));
        group_parents.insert(*id, group.parent_id());
    }

    // Attach image layers to their groups; ungrouped layers go to the root.
    let mut loose: Vec<Layer> = Vec::new();
    for psd_layer in psd.layers() {
        let layer = convert_layer(psd_layer, canvas);
        match psd_layer.parent_id().and_then(|id| groups.get_mut(&id)) {
            Some(group) => group.children.push(layer),
            None => loose.push(layer),
        }
    }

    // Fold groups into their parents, deepest first: a nested group's record
    // follows its parent's, so walking ids in descending order guarantees the
    // parent is still in the map when its child moves in.
    let mut roots: Vec<Layer> = Vec::new();
    let ids: Vec<u32> = groups.keys().rev().copied().collect();
    for id in ids {
        if let Some(node) = groups.remove(&id) {
            let parent = group_parents.get(&id).copied().flatten();
            match parent.and_then(|pid| groups.get_mut(&pid)) {
                Some(parent_node) => parent_node.children.insert(0, node),
                None => roots.insert(0, node),
            }
        }
    }
    roots.append(&mut loose);

    Ok(Document { layers: roots, canvas })
}

/// Convert one PSD image layer, cropping its canvas-sized pixel data down
/// to the layer's own bounding rectangle.
fn convert_layer(psd_layer: &psd::PsdLayer, canvas: Rect) -> Layer {
    let left = psd_layer.layer_left();
    let top = psd_layer.layer_top();
    let width = (psd_layer.layer_right() - left).max(0) as u32;
    let height = (psd_layer.layer_bottom() - top).max(0) as u32;
    let rect = Rect::new(left, top, width, height);

    let mut surface = PixelBuffer::new(rect);
    if !rect.is_empty() {
        // rgba() is document-sized; sample only inside the layer rect,
        // clamped to the canvas.
        let rgba = psd_layer.rgba();
        let sample = rect.intersect(&canvas);
        for y in sample.top..sample.bottom() {
            for x in sample.left..sample.right() {
                let idx = 4 * (y as usize * canvas.width as usize + x as usize);
                if let Some(px) = rgba.get(idx..idx + 4) {
                    surface.set(
                        x,
                        y,
                        Rgba64 {
                            r: widen(px[0]),
                            g: widen(px[1]),
                            b: widen(px[2]),
                            a: widen(px[3]),
                        },
                    );
                }
            }
        }
    }

    Layer::image(psd_layer.name(), surface)
}
