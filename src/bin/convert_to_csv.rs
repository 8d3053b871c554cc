/*
Re-export an existing golden-set JSONL as a readable CSV.

cargo run --bin convert_to_csv
cargo run --bin convert_to_csv -- --input other.jsonl --output other.csv
*/

use anyhow::{Context, Result};
use clap::Parser;
use golden_set::export::{self, DEFAULT_CSV, DEFAULT_JSONL};
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[arg(long, default_value = DEFAULT_JSONL)]
    input: PathBuf,

    #[arg(long, default_value = DEFAULT_CSV)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    SimpleLogger::init(LevelFilter::Info, Config::default())?;

    info!("Reading {:?}...", cli.input);
    let rows = export::read_jsonl(&cli.input)
        .with_context(|| format!("cannot read golden set {:?}", cli.input))?;

    info!("Saving as CSV...");
    export::write_csv(&cli.output, &rows)?;

    info!("Done! Wrote {} rows to {:?}", rows.len(), cli.output);
    Ok(())
}
