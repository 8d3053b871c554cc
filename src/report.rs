//! Progress reporting hooks for the pipeline stages.

use crate::classify::{Label, LabeledRecord};
use crate::filter::FilterReport;
use crate::sample::SampleOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// Number of records per label, in label order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelCounts(pub BTreeMap<Label, usize>);

impl LabelCounts {
    pub fn tally(records: &[LabeledRecord]) -> Self {
        let mut counts = BTreeMap::new();
        for r in records {
            *counts.entry(r.label).or_default() += 1;
        }
        Self(counts)
    }

    pub fn get(&self, label: Label) -> usize {
        self.0.get(&label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

/// Receives progress from the pipeline. Every hook defaults to a no-op.
pub trait Reporter {
    fn stage(&mut self, _name: &str) {}
    /// Bar ticked once per classified record.
    fn progress_bar(&mut self, _len: u64) -> ProgressBar {
        ProgressBar::hidden()
    }
    fn loaded(&mut self, _count: usize) {}
    fn filtered(&mut self, _report: &FilterReport) {}
    fn classified(&mut self, _counts: &LabelCounts) {}
    fn sampled(&mut self, _outcome: &SampleOutcome) {}
    fn exported(&mut self, _path: &Path, _rows: usize) {}
}

pub struct NullReporter;

impl Reporter for NullReporter {}

/// Forwards everything to the `log` facade.
#[derive(Default)]
pub struct LogReporter {
    step: usize,
}

impl Reporter for LogReporter {
    fn stage(&mut self, name: &str) {
        self.step += 1;
        info!("{}. {}", self.step, name);
    }

    fn progress_bar(&mut self, len: u64) -> ProgressBar {
        let bar = ProgressBar::new(len);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    }

    fn loaded(&mut self, count: usize) {
        info!("   > Loaded {count} rows.");
    }

    fn filtered(&mut self, report: &FilterReport) {
        info!("   > Dropped {} rows.", report.dropped);
        info!("   > Remaining: {} rows.", report.kept);
    }

    fn classified(&mut self, counts: &LabelCounts) {
        for (label, n) in &counts.0 {
            info!("   > {:<10} {}", label.as_str(), n);
        }
    }

    fn sampled(&mut self, o: &SampleOutcome) {
        if o.drawn < o.requested {
            warn!(
                "   > {}: wanted {}, pool has {}; took {}",
                o.label, o.requested, o.available, o.drawn
            );
        } else {
            info!("   > {}: {} of {}", o.label, o.drawn, o.available);
        }
    }

    fn exported(&mut self, path: &Path, rows: usize) {
        info!("   > Wrote {rows} rows to {:?}", path);
    }
}
