//! Seeded per-label sampling without replacement.

use crate::classify::{Label, LabeledRecord};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("cannot take {requested} {label} samples: only {available} available")]
    InsufficientPool {
        label: Label,
        requested: usize,
        available: usize,
    },

    #[error("label {0} has more than one quota")]
    DuplicateQuota(Label),
}

/// What to do when a label's pool is smaller than its quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortfallPolicy {
    /// Fail the run.
    Strict,
    /// Take the whole pool.
    BestEffort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub label: Label,
    pub count: usize,
    pub shortfall: ShortfallPolicy,
}

impl Quota {
    pub fn new(label: Label, count: usize, shortfall: ShortfallPolicy) -> Self {
        Self { label, count, shortfall }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleOutcome {
    pub label: Label,
    pub requested: usize,
    pub available: usize,
    pub drawn: usize,
}

/// Per-label samples concatenated in quota order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoldenSet {
    pub records: Vec<LabeledRecord>,
    pub outcomes: Vec<SampleOutcome>,
}

impl GoldenSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Draw each quota from the records carrying its label.
///
/// Every quota gets its own RNG seeded with `seed`, so one label's draw does
/// not depend on the size or order of the others.
pub fn stratified_sample(
    records: &[LabeledRecord],
    quotas: &[Quota],
    seed: u64,
) -> Result<GoldenSet, SampleError> {
    let mut seen = HashSet::new();
    if let Some(dup) = quotas.iter().find(|q| !seen.insert(q.label)) {
        return Err(SampleError::DuplicateQuota(dup.label));
    }

    let mut set = GoldenSet::default();
    for quota in quotas {
        let pool: Vec<&LabeledRecord> = records.iter().filter(|r| r.label == quota.label).collect();
        let available = pool.len();

        let take = match quota.shortfall {
            _ if available >= quota.count => quota.count,
            ShortfallPolicy::BestEffort => available,
            ShortfallPolicy::Strict => {
                return Err(SampleError::InsufficientPool {
                    label: quota.label,
                    requested: quota.count,
                    available,
                })
            }
        };

        let mut rng = StdRng::seed_from_u64(seed);
        set.records.extend(
            index::sample(&mut rng, available, take)
                .into_iter()
                .map(|i| pool[i].clone()),
        );
        set.outcomes.push(SampleOutcome {
            label: quota.label,
            requested: quota.count,
            available,
            drawn: take,
        });
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Signals;
    use crate::dataset::Record;

    fn pool(label: Label, n: usize) -> Vec<LabeledRecord> {
        (0..n)
            .map(|i| LabeledRecord {
                record: Record::new(format!("{label} {i}"), "", ""),
                label,
                signals: Signals::default(),
            })
            .collect()
    }

    #[test]
    fn draws_without_replacement() {
        let records = pool(Label::Advice, 50);
        let set = stratified_sample(&records, &[Quota::new(Label::Advice, 40, ShortfallPolicy::Strict)], 42)
            .unwrap();
        let unique: HashSet<_> = set.records.iter().map(|r| &r.record.instruction).collect();
        assert_eq!(set.len(), 40);
        assert_eq!(unique.len(), 40);
    }

    #[test]
    fn zero_quota_on_empty_pool_is_fine() {
        let set = stratified_sample(&[], &[Quota::new(Label::Unsure, 0, ShortfallPolicy::Strict)], 1).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.outcomes[0].drawn, 0);
    }

    #[test]
    fn duplicate_quota_rejected() {
        let q = Quota::new(Label::Guidance, 1, ShortfallPolicy::Strict);
        assert_eq!(
            stratified_sample(&pool(Label::Guidance, 3), &[q, q], 0),
            Err(SampleError::DuplicateQuota(Label::Guidance))
        );
    }
}
