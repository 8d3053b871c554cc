/*
cargo run --bin create_golden_set

cargo run --bin create_golden_set -- \
    --input data/finance_alpaca.json \
    --advice 40 --edge-cases 30 --guidance 30 \
    --capped "Edge Case" \
    --seed 42
*/

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use golden_set::dataset::{self, HubSource, DEFAULT_DATASET, DEFAULT_DATA_FILE};
use golden_set::export::{self, DEFAULT_CSV, DEFAULT_JSONL};
use golden_set::pipeline::{self, PipelineConfig, DEFAULT_CAPPED, DEFAULT_SEED};
use golden_set::{logging, KeywordFamilies, Label, LogReporter, Reporter, ShortfallPolicy};
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
#[command(version, about = "Build the stratified finance golden set (JSONL + CSV)")]
struct Cli {
    // Hub dataset ID
    #[arg(long, default_value = DEFAULT_DATASET)]
    dataset: String,

    // File inside the dataset repo
    #[arg(long, default_value = DEFAULT_DATA_FILE)]
    data_file: String,

    #[arg(long, default_value = "main")]
    revision: String,

    // Local .json / .jsonl file; skips the hub
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    // HF access token (falls back to cached creds)
    #[arg(long, env = "HF_TOKEN")]
    token: Option<String>,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long, default_value_t = 40)]
    advice: usize,

    #[arg(long, default_value_t = 30)]
    edge_cases: usize,

    #[arg(long, default_value_t = 30)]
    guidance: usize,

    // Shortfall policy for labels not listed in --capped
    #[arg(long, value_enum, default_value_t = Sampling::Strict)]
    sampling: Sampling,

    // Labels whose quota is capped to the pool size
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_CAPPED)]
    capped: Vec<Label>,

    // Ignore --capped and apply --sampling to every label
    #[arg(long)]
    uncapped: bool,

    // JSON file overriding the keyword families
    #[arg(long, value_name = "PATH")]
    keywords: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_JSONL)]
    out_jsonl: PathBuf,

    #[arg(long, default_value = DEFAULT_CSV)]
    out_csv: PathBuf,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::golden_set();
        if let Some(path) = &self.keywords {
            config.keywords = KeywordFamilies::from_json_file(path)?;
        }
        config.seed = self.seed;
        let capped: &[Label] = if self.uncapped { &[] } else { &self.capped };
        config.set_quotas(
            &[
                (Label::Advice, self.advice),
                (Label::EdgeCase, self.edge_cases),
                (Label::Guidance, self.guidance),
            ],
            self.sampling.into(),
            capped,
        );
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = logging::init(&cli.log_dir, "create_golden_set")?;
    info!("--- Starting Clean Generation ---");

    let config = cli.pipeline_config()?;
    let mut reporter = LogReporter::default();

    reporter.stage("Loading dataset");
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

    let golden = pipeline::run(records, &config, &mut reporter).context("sampling failed")?;

    reporter.stage("Saving files");
    let rows = export::rows(&golden.records);
    export::write_jsonl(&cli.out_jsonl, &rows)?;
    reporter.exported(&cli.out_jsonl, rows.len());
    export::write_csv(&cli.out_csv, &rows)?;
    reporter.exported(&cli.out_csv, rows.len());

    println!("\n=== Golden set summary ===");
    for o in &golden.outcomes {
        println!("{:<10} : {:>3} of {:>3} requested (pool {})", o.label.as_str(), o.drawn, o.requested, o.available);
    }
    println!("Total rows : {}", rows.len());
    println!("Columns    : [\"instruction\", \"output\", \"presumed_label\"]");
    println!("JSONL      : {:?}", cli.out_jsonl);
    println!("CSV        : {:?}", cli.out_csv);
    println!("Log file   : {:?}", log_path);
    Ok(())
}
