//! Build a stratified "golden set" of finance Q/A examples.
//!
//! Records are loaded from an Alpaca-style dataset, optionally stripped of
//! rows that carry auxiliary input, labelled by keyword heuristics, sampled
//! per label with a fixed seed and exported as JSON Lines plus CSV.

pub mod classify;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod sample;

pub use classify::{
    Classifier, ClassifierConfig, DecisionRule, KeywordFamilies, Label, LabeledRecord, MatchMode,
    Signals, TextSource,
};
pub use dataset::Record;
pub use export::ExportRow;
pub use filter::{filter_zero_shot, FilterReport};
pub use pipeline::{run, PipelineConfig};
pub use report::{LabelCounts, LogReporter, NullReporter, Reporter};
pub use sample::{stratified_sample, GoldenSet, Quota, SampleError, SampleOutcome, ShortfallPolicy};
