//! Export pipeline - configuration, error taxonomy, and the run driver.
//!
//! Two distinct failure policies, both deliberate:
//! - configuration and decode errors are fatal and abort the run before
//!   anything is written;
//! - an error inside one root layer's subtree is caught here, logged, and
//!   does not stop the remaining root layers (best-effort export).

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::color::{self, InvalidColor};
use crate::decode;
use crate::document::Document;
use crate::walk::{FilePngSink, LayerWalker, PngSink, WalkOptions};
use crate::ENGINE_VERSION;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Color(#[from] InvalidColor),

    #[error("failed to decode document: {0}")]
    Decode(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Run configuration, constructed once at startup and passed in by value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Source PSD file.
    pub input: PathBuf,
    /// Output directory; defaults to the input file's directory.
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    /// Background color token: a palette name or a 6-hex-digit code.
    #[serde(default)]
    pub bgcolor: Option<String>,
    /// Shorthand for `bgcolor = "white"`; an explicit token wins.
    #[serde(default)]
    pub white_background: bool,
    /// Reproject every leaf onto the document canvas before compositing.
    #[serde(default)]
    pub keep_canvas_bounds: bool,
}

impl ExportConfig {
    /// Effective bgcolor token. The explicit token has precedence over the
    /// white shortcut.
    pub fn bgcolor_token(&self) -> Option<&str> {
        match (&self.bgcolor, self.white_background) {
            (Some(token), _) => Some(token),
            (None, true) => Some("white"),
            (None, false) => None,
        }
    }

    fn resolve_out_dir(&self) -> PathBuf {
        if let Some(dir) = &self.out_dir {
            return dir.clone();
        }
        match self.input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// One file written during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedFile {
    pub path: String,
    /// `/`-joined layer name path inside the document.
    pub layer: String,
    pub size: [u32; 2],
    pub sha256: String,
}

/// Manifest of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub id: String,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub exported: Vec<ExportedFile>,
    pub warnings: Vec<String>,
}

impl ExportReport {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The export pipeline - single entry point for a run.
pub struct ExportPipeline {
    config: ExportConfig,
}

impl ExportPipeline {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Decode the configured input file and export every layer.
    pub fn run(&self) -> Result<ExportReport, ExportError> {
        // Validate configuration before touching the input file.
        if let Some(token) = self.config.bgcolor_token() {
            color::resolve_color(token)?;
        }
        let document = decode::decode_document(&self.config.input)?;
        self.export_document(&document)
    }

    /// Export an already-decoded document to the filesystem.
    pub fn export_document(&self, document: &Document) -> Result<ExportReport, ExportError> {
        let mut sink = FilePngSink;
        let mut report = self.export_document_with(document, &mut sink)?;

        // Manifest hashes for the files that made it to disk.
        for file in &mut report.exported {
            if let Ok(bytes) = fs::read(&file.path) {
                file.sha256 = sha256_hex(&bytes);
            }
        }
        Ok(report)
    }

    /// Export through a caller-supplied sink.
    pub fn export_document_with<S: PngSink>(
        &self,
        document: &Document,
        sink: &mut S,
    ) -> Result<ExportReport, ExportError> {
        let bgcolor = self.config.bgcolor_token().map(color::resolve_color).transpose()?;

        let out_dir = self.config.resolve_out_dir();
        if !out_dir.exists() {
            println!("directory {} does not exist. create...", out_dir.display());
            fs::create_dir_all(&out_dir)?;
        }

        let options = WalkOptions {
            bgcolor,
            canvas: self.config.keep_canvas_bounds.then_some(document.canvas),
        };

        let mut walker = LayerWalker::new(&options, sink);
        for (i, layer) in document.layers.iter().enumerate() {
            let stem = out_dir.join(format!("{i:03}"));
            let stem = stem.to_string_lossy();
            // One bad root layer must not block the rest of the document.
            if let Err(e) = walker.walk(layer, &stem, &layer.name) {
                eprintln!("[WARN] {stem}: {e}");
                walker.warnings.push(format!("{stem}: {e}"));
            }
        }

        Ok(ExportReport {
            id: Uuid::new_v4().to_string(),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: Utc::now(),
            source: self.config.input.to_string_lossy().into_owned(),
            exported: walker.exported,
            warnings: walker.warnings,
        })
    }
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_bgcolor_beats_white_shortcut() {
        let config = ExportConfig {
            bgcolor: Some("red".to_string()),
            white_background: true,
            ..Default::default()
        };
        assert_eq!(config.bgcolor_token(), Some("red"));
    }

    #[test]
    fn white_shortcut_applies_without_explicit_token() {
        let config = ExportConfig { white_background: true, ..Default::default() };
        assert_eq!(config.bgcolor_token(), Some("white"));
    }

    #[test]
    fn no_bgcolor_means_no_compositing() {
        assert_eq!(ExportConfig::default().bgcolor_token(), None);
    }

    #[test]
    fn out_dir_defaults_to_input_directory() {
        let config = ExportConfig { input: PathBuf::from("art/scene.psd"), ..Default::default() };
        assert_eq!(config.resolve_out_dir(), PathBuf::from("art"));

        let bare = ExportConfig { input: PathBuf::from("scene.psd"), ..Default::default() };
        assert_eq!(bare.resolve_out_dir(), PathBuf::from("."));
    }

    #[test]
    fn sha256_hex_stable() {
        assert_eq!(sha256_hex(b"abc"), sha256_hex(b"abc"));
        assert_eq!(sha256_hex(b"abc").len(), 64);
    }
}
