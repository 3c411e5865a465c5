//! Tikzcircuit - circuitikz to JSON converter
//!
//! Batch-converts LaTeX documents containing circuitikz drawings into
//! ordered JSON element lists.
//!
//! # Usage
//!
//! ```bash
//! tikzcircuit input-001.tex input-002.tex
//! ```
//!
//! Each `input.tex` produces an `input.json` next to it (or inside
//! `--out-dir`). A document with no drawing block yields a JSON error
//! object instead of aborting the batch.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tikzcircuit::{convert_document, error::Result, TikzError};

/// Circuitikz to JSON converter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// LaTeX documents to convert
    #[arg(value_name = "TEX_FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for the JSON outputs (defaults to each input's directory)
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    for input in &args.inputs {
        let output = output_path(input, args.out_dir.as_deref());
        convert_file(input, &output)?;
    }

    Ok(())
}

/// Map `dir/name.tex` to `dir/name.json`, or into `out_dir` when given.
fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let renamed = input.with_extension("json");
    match (out_dir, renamed.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => renamed,
    }
}

fn convert_file(input: &Path, output: &Path) -> Result<()> {
    let latex = fs::read_to_string(input)
        .map_err(|e| TikzError::file_read(input.display().to_string(), e))?;

    let json = match convert_document(&latex) {
        Ok(elements) => {
            log::info!(
                "{}: extracted {} element(s)",
                input.display(),
                elements.len()
            );
            serde_json::to_string_pretty(&elements)
                .map_err(|source| TikzError::Serialize { source })?
        }
        Err(TikzError::NoDrawingBlock) => {
            log::warn!("{}: no drawing block found", input.display());
            let error = serde_json::json!({
                "error": "No valid \\begin{circuitikz} block found in the file."
            });
            serde_json::to_string_pretty(&error)
                .map_err(|source| TikzError::Serialize { source })?
        }
        Err(err) => return Err(err),
    };

    fs::write(output, json).map_err(|e| TikzError::file_write(output.display().to_string(), e))?;
    Ok(())
}
