/*
Logbook variant: every row (no input filter), instruction + input text,
three-way decision rule, strict 40/30/30 quotas.

cargo run --bin sample_data
cargo run --bin sample_data -- --input data/finance_alpaca.json --sampling best-effort
*/

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use golden_set::dataset::{self, HubSource, DEFAULT_DATASET, DEFAULT_DATA_FILE};
use golden_set::export::{self, DEFAULT_JSONL};
use golden_set::pipeline::{self, PipelineConfig, DEFAULT_SEED};
use golden_set::{logging, KeywordFamilies, LogReporter, Reporter, ShortfallPolicy};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Sampling {
    Strict,
    BestEffort,
}

impl From<Sampling> for ShortfallPolicy {
    fn from(s: Sampling) -> Self {
        match s {
            Sampling::Strict => ShortfallPolicy::Strict,
            Sampling::BestEffort => ShortfallPolicy::BestEffort,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Stratified logbook sample (three-way rule, JSONL only)")]
struct Cli {
    #[arg(long, default_value = DEFAULT_DATASET)]
    dataset: String,

    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    data_file: String,

    #[arg(long, default_value = "main")]
    revision: String,

    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    #[arg(long, env = "HF_TOKEN")]
    token: Option<String>,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = Sampling::Strict)]
    sampling: Sampling,

    #[arg(long, value_name = "PATH")]
    keywords: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_JSONL)]
    out_jsonl: PathBuf,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_dir, "sample_data")?;

    let mut config = PipelineConfig::logbook();
    config.seed = cli.seed;
    for quota in &mut config.quotas {
        quota.shortfall = cli.sampling.into();
    }
    if let Some(path) = &cli.keywords {
        config.keywords = KeywordFamilies::from_json_file(path)?;
    }

    let mut reporter = LogReporter::default();
    reporter.stage(&format!("Loading {} dataset", cli.dataset));
    let data_path = match &cli.input {
        Some(path) => path.clone(),
        None => dataset::fetch_from_hub(&HubSource {
            repo_id: cli.dataset.clone(),
            filename: cli.data_file.clone(),
            revision: cli.revision.clone(),
            token: cli.token.clone(),
        })?,
    };
    let records = dataset::load_records(&data_path)?;

    let golden = pipeline::run(records, &config, &mut reporter)
        .with_context(|| format!("cannot draw the logbook sample from {:?}", data_path))?;

    let rows = export::rows(&golden.records);
    export::write_jsonl(&cli.out_jsonl, &rows)?;
    reporter.exported(&cli.out_jsonl, rows.len());

    info!("Success! Created validation set with {} samples.", rows.len());
    for o in &golden.outcomes {
        info!("- {} {} samples", o.drawn, o.label);
    }
    Ok(())
}
