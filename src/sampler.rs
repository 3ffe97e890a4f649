//! Seeded random reduction of raw line datasets
//!
//! Selection only, no per-line transformation: a run over the same input
//! with the same seed always picks the same subset. The whole input is held
//! in memory, which caps usable input size at available RAM; inputs beyond
//! that need a streaming reservoir sampler with the same uniform-selection
//! contract.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Fixed default seed so repeated reductions of the same dump agree.
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Default target line count for the `reduce` binary.
pub const DEFAULT_TARGET_LINES: usize = 100_000;

/// Select `target` lines uniformly at random without replacement.
///
/// If the input has `target` lines or fewer, every line is returned. Output
/// order is the selection order, not the input order.
pub fn sample_lines(lines: Vec<String>, target: usize, seed: u64) -> Vec<String> {
    if lines.len() <= target {
        return lines;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let picked = index::sample(&mut rng, lines.len(), target);
    // Indices from index::sample are distinct, so each slot is taken once.
    let mut lines = lines;
    picked
        .iter()
        .map(|i| std::mem::take(&mut lines[i]))
        .collect()
}

/// Reduce an input file to at most `target` lines, written to `output`.
///
/// Returns the number of lines written. I/O errors are fatal and propagate.
pub fn reduce_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    target: usize,
    seed: u64,
) -> io::Result<usize> {
    let reader = BufReader::new(File::open(input.as_ref())?);
    let lines: Vec<String> = reader.lines().collect::<Result<_, _>>()?;
    let total = lines.len();

    if total <= target {
        log::info!(
            "📉 Input smaller than target ({} <= {}), keeping all lines",
            total,
            target
        );
    }
    let sampled = sample_lines(lines, target, seed);

    let mut out = BufWriter::new(File::create(output.as_ref())?);
    for line in &sampled {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;

    log::info!(
        "✅ Reduction complete: {} of {} lines saved to {}",
        sampled.len(),
        total,
        output.as_ref().display()
    );
    Ok(sampled.len())
}
