//! Reduce Binary - seeded random sampling down to a target line count
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin reduce -- <input> <output> [--n SIZE] [--seed SEED]
//! ```
//!
//! ## Environment Variables
//!
//! - SAMPLE_SEED - sampling seed when --seed is not given (default: 42)
//! - RUST_LOG - logging level (optional, default: info)

use std::env;
use std::process;
use vidflow::sampler::{reduce_file, DEFAULT_TARGET_LINES};
use vidflow::Config;

struct ReduceArgs {
    input: String,
    output: String,
    target: usize,
    seed: Option<u64>,
}

fn parse_args() -> Result<ReduceArgs, String> {
    let mut positionals = Vec::new();
    let mut target = DEFAULT_TARGET_LINES;
    let mut seed = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--n" => {
                target = args
                    .next()
                    .and_then(|v| v.parse().ok())
                    .ok_or("--n requires a positive number")?;
            }
            "--seed" => {
                seed = Some(
                    args.next()
                        .and_then(|v| v.parse().ok())
                        .ok_or("--seed requires a number")?,
                );
            }
            _ => positionals.push(arg),
        }
    }

    if positionals.len() != 2 {
        return Err("expected exactly two positional arguments".to_string());
    }
    let mut positionals = positionals.into_iter();
    Ok(ReduceArgs {
        input: positionals.next().unwrap(),
        output: positionals.next().unwrap(),
        target,
        seed,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = Config::from_env();
    let args = parse_args().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Usage: reduce <input> <output> [--n SIZE] [--seed SEED]");
        process::exit(2);
    });
    let seed = args.seed.unwrap_or(config.sample_seed);

    log::info!("🚀 Reducing {} -> {}", args.input, args.output);
    log::info!("   Target: {} lines, seed: {}", args.target, seed);

    reduce_file(&args.input, &args.output, args.target, seed)?;

    Ok(())
}
