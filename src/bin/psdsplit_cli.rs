//! psdsplit CLI - split a PSD into one PNG per layer.
//!
//! Fatal errors (bad config, unreadable or undecodable input) print a
//! diagnostic and exit non-zero; per-layer failures are reported as
//! warnings and do not stop the run.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use psdsplit_core::{ExportConfig, ExportPipeline};

#[derive(Parser)]
#[command(name = "psdsplit-cli")]
#[command(about = "PSD Layer Splitter - export every layer as a PNG")]
struct Cli {
    /// PSD file to split
    #[arg(short, long)]
    file: PathBuf,

    /// Output directory (default: same directory as the input file)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Fill background with a color (name like `white` or hex like `f7ca94`)
    #[arg(long)]
    bgcolor: Option<String>,

    /// Shorthand for `--bgcolor white`; ignored when --bgcolor is given
    #[arg(long = "bw")]
    white_background: bool,

    /// Reproject every layer onto the document canvas bounds
    #[arg(long = "canvas-bounds")]
    keep_canvas_bounds: bool,

    /// Write a manifest.json describing the run into the output directory
    #[arg(long)]
    manifest: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = ExportConfig {
        input: cli.file,
        out_dir: cli.out,
        bgcolor: cli.bgcolor,
        white_background: cli.white_background,
        keep_canvas_bounds: cli.keep_canvas_bounds,
    };
    let out_dir = match &config.out_dir {
        Some(dir) => dir.clone(),
        None => match config.input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        },
    };

    let pipeline = ExportPipeline::new(config);
    let report = match pipeline.run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.manifest {
        let json = match report.to_json_pretty() {
            Ok(json) => json,
            Err(e) => {
                eprintln!("error: failed to serialize manifest: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = fs::write(out_dir.join("manifest.json"), json) {
            eprintln!("error: failed to write manifest: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
