use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Sources listed in the commentary section of the summary report.
    pub report_top_sources: usize,
    /// Translation groups listed in the summary report.
    pub report_top_translations: usize,
    pub groups_file: String,
    pub commentary_mapping_file: String,
    pub translations_file: String,
    pub zhushu_summary_file: String,
    pub groups_report_file: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            report_top_sources: 100,
            report_top_translations: 50,
            groups_file: "sutra_groups_v2.json".to_string(),
            commentary_mapping_file: "sutra_zhushu_mapping.json".to_string(),
            translations_file: "sutra_translations.json".to_string(),
            zhushu_summary_file: "zhushu_summary.txt".to_string(),
            groups_report_file: "sutra_groups_v2_report.txt".to_string(),
        }
    }
}

impl AnalysisSettings {
    /// Settings from JSON. Fields left out keep their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }
}
