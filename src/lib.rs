pub mod cli;
pub mod config;
pub mod convert;
pub mod engine;
pub mod pipeline;

pub use convert::Converter;
pub use pipeline::{Pipeline, transpile};

use anyhow::Context;
use clap::Parser;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // 1. ── Configure ──────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => config::load(path)?,
        None => config::Config::default(),
    }
    .without(&args.skip);
    if let Some(headers) = args.headers {
        config.headers = headers;
    }
    if args.no_provenance {
        config.provenance = false;
    }

    // 2. ── Read ───────────────────────────────────────────────────────
    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;
    log::info!("read {} ({} bytes)", args.input.display(), source.len());

    // 3. ── Convert ────────────────────────────────────────────────────
    let pipeline = Pipeline::standard(&config);
    let converted = pipeline.run(&source);

    // 4. ── Write ──────────────────────────────────────────────────────
    std::fs::write(&args.output, &converted)
        .with_context(|| format!("Writing {}", args.output.display()))?;
    log::info!("wrote {} after {:?}", args.output.display(), pipeline.passes());

    Ok(())
}
