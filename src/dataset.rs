//! Loading Alpaca-style records from the Hugging Face hub or a local file.

use hf_hub::api::sync::{ApiBuilder, ApiError};
use hf_hub::{Repo, RepoType};
use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATASET: &str = "gbharti/finance-alpaca";
pub const DEFAULT_DATA_FILE: &str = "Cleaned_date.json";

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path:?} (line {line}): {source}")]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("hub download failed: {0}")]
    Hub(#[from] ApiError),
}

/// One instruction/input/output row.
///
/// Missing or `null` fields become empty text; non-string scalars are kept
/// as their JSON text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub instruction: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub input: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub output: String,
}

impl Record {
    pub fn new(
        instruction: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            instruction: instruction.into(),
            input: input.into(),
            output: output.into(),
        }
    }
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Where to fetch the dataset from on the hub.
#[derive(Debug, Clone)]
pub struct HubSource {
    pub repo_id: String,
    pub filename: String,
    pub revision: String,
    pub token: Option<String>,
}

impl Default for HubSource {
    fn default() -> Self {
        Self {
            repo_id: DEFAULT_DATASET.to_string(),
            filename: DEFAULT_DATA_FILE.to_string(),
            revision: "main".to_string(),
            token: None,
        }
    }
}

/// Download (or reuse from the HF cache) the dataset file and return its
/// local path.
pub fn fetch_from_hub(source: &HubSource) -> Result<PathBuf, DatasetError> {
    let api = ApiBuilder::new().with_token(source.token.clone()).build()?;
    let repo = Repo::with_revision(
        source.repo_id.clone(),
        RepoType::Dataset,
        source.revision.clone(),
    );
    info!(
        "Fetching {}/{} (revision {})",
        source.repo_id, source.filename, source.revision
    );
    let path = api.repo(repo).get(&source.filename)?;
    debug!("Dataset cached at {:?}", path);
    Ok(path)
}

/// Read records from a JSON array file or a JSON Lines file.
///
/// `.jsonl` files are always read line by line; anything else is parsed as
/// an array when it starts with `[` and as JSON Lines otherwise.
pub fn load_records(path: &Path) -> Result<Vec<Record>, DatasetError> {
    let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_jsonl = path.extension().and_then(|e| e.to_str()) == Some("jsonl");
    if !is_jsonl && raw.trim_start().starts_with('[') {
        return serde_json::from_str(&raw).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            line: source.line(),
            source,
        });
    }
    parse_lines(path, &raw)
}

fn parse_lines(path: &Path, raw: &str) -> Result<Vec<Record>, DatasetError> {
    let mut rows = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(line).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}
