//! Normalize Binary - raw TSV rows to canonical JSONL records
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin normalize -- <input.tsv> <output.jsonl> [--max-rows N]
//! ```
//!
//! Rows with fewer than nine tab-separated columns, or that fail numeric
//! coercion, are dropped (and counted), never partially written.

use std::env;
use std::process;
use vidflow::record::normalize_file;

struct NormalizeArgs {
    input: String,
    output: String,
    max_rows: Option<usize>,
}

fn parse_args() -> Result<NormalizeArgs, String> {
    let mut positionals = Vec::new();
    let mut max_rows = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--max-rows" => {
                max_rows = Some(
                    args.next()
                        .and_then(|v| v.parse().ok())
                        .ok_or("--max-rows requires a positive number")?,
                );
            }
            _ => positionals.push(arg),
        }
    }

    if positionals.len() != 2 {
        return Err("expected exactly two positional arguments".to_string());
    }
    let mut positionals = positionals.into_iter();
    Ok(NormalizeArgs {
        input: positionals.next().unwrap(),
        output: positionals.next().unwrap(),
        max_rows,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let args = parse_args().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Usage: normalize <input.tsv> <output.jsonl> [--max-rows N]");
        process::exit(2);
    });

    log::info!("🚀 Normalizing {} -> {}", args.input, args.output);
    if let Some(max) = args.max_rows {
        log::info!("   Row cap: {}", max);
    }

    let (kept, dropped) = normalize_file(&args.input, &args.output, args.max_rows)?;
    log::info!("📊 Kept {} records, dropped {} malformed rows", kept, dropped);

    Ok(())
}
