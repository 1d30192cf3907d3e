//! Reading CBETA JSON documents into records.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::types::Record;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Corpus directory does not exist or is not a directory: {0:?}")]
    NotADirectory(PathBuf),
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct DocumentHeader {
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    source: String,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    id: String,
    #[serde(default)]
    header: DocumentHeader,
}

/// Read the record of a single document. Fields the document lacks are empty.
pub fn read_record(path: &Path) -> Result<Record, CorpusError> {
    let content = fs::read_to_string(path).map_err(|e| CorpusError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let doc: Document = serde_json::from_str(&content).map_err(|e| CorpusError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(Record {
        id: doc.id,
        title: doc.header.title,
        author: doc.header.author,
        source: doc.header.source,
    })
}

/// Read every `*.json` document below `data_dir`, in sorted path order.
///
/// Documents that cannot be read or parsed, lack an id, or repeat an id
/// already seen are skipped with a warning.
pub fn read_corpus(data_dir: &Path) -> Result<Vec<Record>, CorpusError> {
    if !data_dir.is_dir() {
        return Err(CorpusError::NotADirectory(data_dir.to_path_buf()));
    }

    let mut records = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut skipped = 0;

    let entries = WalkDir::new(data_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"));

    for entry in entries {
        let record = match read_record(entry.path()) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping document: {}", e);
                skipped += 1;
                continue;
            }
        };

        if record.id.is_empty() {
            tracing::warn!("Skipping document without id: {:?}", entry.path());
            skipped += 1;
            continue;
        }
        if !seen_ids.insert(record.id.clone()) {
            tracing::warn!("Skipping duplicate id {} in {:?}", record.id, entry.path());
            skipped += 1;
            continue;
        }

        records.push(record);
    }

    tracing::info!("Read {} records from {:?}, skipped {}", records.len(), data_dir, skipped);

    Ok(records)
}

/// Sorted, de-duplicated, non-empty titles.
pub fn collect_titles(records: &[Record]) -> Vec<String> {
    let mut titles: Vec<String> = records
        .iter()
        .map(|r| r.title.clone())
        .filter(|t| !t.is_empty())
        .collect();
    titles.sort();
    titles.dedup();
    titles
}
