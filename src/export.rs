//! JSON Lines and CSV writers for the golden set.
//!
//! Only `instruction`, `output` and `presumed_label` are written, in that
//! order, whatever else the in-memory records carry. Existing files are
//! overwritten.

use crate::classify::{Label, LabeledRecord};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_JSONL: &str = "logbook_validation_100.jsonl";
pub const DEFAULT_CSV: &str = "logbook_validation_100_readable.csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path:?} (line {line}): {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error on {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub instruction: String,
    pub output: String,
    pub presumed_label: Label,
}

impl From<&LabeledRecord> for ExportRow {
    fn from(r: &LabeledRecord) -> Self {
        Self {
            instruction: r.record.instruction.clone(),
            output: r.record.output.clone(),
            presumed_label: r.label,
        }
    }
}

pub fn rows(records: &[LabeledRecord]) -> Vec<ExportRow> {
    records.iter().map(ExportRow::from).collect()
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn create(path: &Path) -> Result<File, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(io_err(path))?;
    }
    File::create(path).map_err(io_err(path))
}

pub fn write_jsonl(path: &Path, rows: &[ExportRow]) -> Result<(), ExportError> {
    let mut out = BufWriter::new(create(path)?);
    for (idx, row) in rows.iter().enumerate() {
        let line = serde_json::to_string(row).map_err(|source| ExportError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        writeln!(out, "{line}").map_err(io_err(path))?;
    }
    out.flush().map_err(io_err(path))
}

pub fn write_csv(path: &Path, rows: &[ExportRow]) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    // Explicit header: an empty set still gets one.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(create(path)?);
    wtr.write_record(["instruction", "output", "presumed_label"])
        .map_err(csv_err)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_err)?;
    }
    wtr.flush().map_err(io_err(path))
}

pub fn read_jsonl(path: &Path) -> Result<Vec<ExportRow>, ExportError> {
    let reader = BufReader::new(File::open(path).map_err(io_err(path))?);
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err(path))?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line).map_err(|source| ExportError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Signals;
    use crate::dataset::Record;

    #[test]
    fn extra_fields_are_not_exported() {
        let rec = LabeledRecord {
            record: Record::new("Q", "hidden input", "A"),
            label: Label::EdgeCase,
            signals: Signals::default(),
        };
        let json = serde_json::to_string(&ExportRow::from(&rec)).unwrap();
        assert_eq!(json, r#"{"instruction":"Q","output":"A","presumed_label":"Edge Case"}"#);
    }

    #[test]
    fn empty_set_still_has_csv_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        write_csv(&path, &[]).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "instruction,output,presumed_label\n");
    }
}
