use crate::dataset::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterReport {
    pub total: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Keep only zero-shot rows: those whose `input` is blank after trimming.
/// Reading-comprehension rows (non-empty input) are dropped. Order is kept.
pub fn filter_zero_shot(records: Vec<Record>) -> (Vec<Record>, FilterReport) {
    let total = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|r| r.input.trim().is_empty())
        .collect();
    let report = FilterReport {
        total,
        kept: kept.len(),
        dropped: total - kept.len(),
    };
    (kept, report)
}
