//! Filter, classify, sample, driven by a [`PipelineConfig`].

use crate::classify::{Classifier, ClassifierConfig, ClassifierError, KeywordFamilies, Label, LabeledRecord};
use crate::dataset::Record;
use crate::filter::filter_zero_shot;
use crate::report::{LabelCounts, Reporter};
use crate::sample::{stratified_sample, GoldenSet, Quota, SampleError, ShortfallPolicy};
use thiserror::Error;

pub const DEFAULT_SEED: u64 = 42;

/// Labels whose quota is capped to the pool unless told otherwise.
pub const DEFAULT_CAPPED: [Label; 1] = [Label::EdgeCase];

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Sample(#[from] SampleError),
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub keywords: KeywordFamilies,
    pub classifier: ClassifierConfig,
    /// Drop rows with non-empty `input` before classifying.
    pub drop_with_input: bool,
    pub quotas: Vec<Quota>,
    pub seed: u64,
}

impl PipelineConfig {
    /// 40 Advice (strict), 30 Edge Case (capped to the pool), 30 Guidance
    /// (strict) from zero-shot rows, four-way rule.
    pub fn golden_set() -> Self {
        let mut config = Self {
            keywords: KeywordFamilies::golden_set(),
            classifier: ClassifierConfig::golden_set(),
            drop_with_input: true,
            quotas: Vec::new(),
            seed: DEFAULT_SEED,
        };
        config.set_quotas(
            &[(Label::Advice, 40), (Label::EdgeCase, 30), (Label::Guidance, 30)],
            ShortfallPolicy::Strict,
            &DEFAULT_CAPPED,
        );
        config
    }

    /// Same 40/30/30 split over every row, three-way rule, all strict.
    pub fn logbook() -> Self {
        Self {
            keywords: KeywordFamilies::logbook(),
            classifier: ClassifierConfig::logbook(),
            drop_with_input: false,
            quotas: vec![
                Quota::new(Label::Advice, 40, ShortfallPolicy::Strict),
                Quota::new(Label::EdgeCase, 30, ShortfallPolicy::Strict),
                Quota::new(Label::Guidance, 30, ShortfallPolicy::Strict),
            ],
            seed: DEFAULT_SEED,
        }
    }

    /// Replace the quotas, in the given order. Labels in `capped` take
    /// whatever their pool holds; the rest follow `policy`.
    pub fn set_quotas(&mut self, counts: &[(Label, usize)], policy: ShortfallPolicy, capped: &[Label]) {
        self.quotas = counts
            .iter()
            .map(|&(label, count)| {
                let shortfall = if capped.contains(&label) {
                    ShortfallPolicy::BestEffort
                } else {
                    policy
                };
                Quota::new(label, count, shortfall)
            })
            .collect();
    }
}

pub fn classify_all(
    classifier: &Classifier,
    records: Vec<Record>,
    reporter: &mut dyn Reporter,
) -> Vec<LabeledRecord> {
    let bar = reporter.progress_bar(records.len() as u64);
    let labeled = records
        .into_iter()
        .map(|r| {
            let out = classifier.classify(r);
            bar.inc(1);
            out
        })
        .collect();
    bar.finish_and_clear();
    labeled
}

pub fn run(
    records: Vec<Record>,
    config: &PipelineConfig,
    reporter: &mut dyn Reporter,
) -> Result<GoldenSet, PipelineError> {
    let classifier = Classifier::new(&config.keywords, config.classifier)?;
    reporter.loaded(records.len());

    let records = if config.drop_with_input {
        reporter.stage("Removing rows with auxiliary input");
        let (kept, report) = filter_zero_shot(records);
        reporter.filtered(&report);
        kept
    } else {
        records
    };

    reporter.stage("Categorizing");
    let labeled = classify_all(&classifier, records, reporter);
    reporter.classified(&LabelCounts::tally(&labeled));

    let wanted: usize = config.quotas.iter().map(|q| q.count).sum();
    reporter.stage(&format!("Selecting {wanted} samples"));
    let set = stratified_sample(&labeled, &config.quotas, config.seed)?;
    for outcome in &set.outcomes {
        reporter.sampled(outcome);
    }
    Ok(set)
}
