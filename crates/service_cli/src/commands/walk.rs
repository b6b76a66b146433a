//! Walk command: digit-angle walk points as CSV

use std::fs;
use std::io::Write;
use std::path::Path;

use quantum_core::walk::{digits_from_text, DigitWalk, WalkMode};
use quantum_core::{RawSupply, Sampler};
use serde::Serialize;
use tracing::info;

use crate::{CliError, Result};

/// Options for one walk
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    pub mode: WalkMode,
    pub step: f64,
    pub iterations: usize,
}

/// One CSV record per walk segment
#[derive(Debug, Serialize)]
struct WalkRow {
    index: usize,
    digit: u8,
    x: f64,
    y: f64,
    colour: &'static str,
}

/// Digits read from `path`, capped at `limit`
pub fn read_digits(path: &Path, limit: usize) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let text = fs::read_to_string(path)?;
    let mut digits = digits_from_text(&text);
    digits.truncate(limit);
    Ok(digits)
}

/// Walk over `digits`, writing `index,digit,x,y,colour` CSV records
pub fn write_walk<W: Write>(digits: &[u8], options: WalkOptions, out: &mut W) -> Result<()> {
    if !(options.step.is_finite() && options.step > 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "step must be a positive number, got {}",
            options.step
        )));
    }

    let mut walk = DigitWalk::new(options.mode, options.step);
    let mut writer = csv::Writer::from_writer(out);
    for (index, &digit) in digits.iter().enumerate() {
        let point = walk.push(digit)?;
        writer.serialize(WalkRow {
            index,
            digit: point.digit,
            x: point.x,
            y: point.y,
            colour: point.colour,
        })?;
    }
    writer.flush()?;

    let (x, y) = walk.position();
    info!(steps = digits.len(), mode = %options.mode, x, y, "walk finished");
    Ok(())
}

/// Walk over digits from `file`, or over freshly drawn digits
pub fn run<S: RawSupply, W: Write>(
    sampler: &mut Sampler<S>,
    file: Option<&Path>,
    options: WalkOptions,
    out: &mut W,
) -> Result<()> {
    let digits = match file {
        Some(path) => read_digits(path, options.iterations)?,
        None => sampler
            .integers(options.iterations, 9)?
            .into_iter()
            .map(|d| d as u8)
            .collect(),
    };
    write_walk(&digits, options, out)
}
