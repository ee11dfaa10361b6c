use crate::error::BelgeError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// What to do when neither master list file exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingStorePolicy {
    /// Start from an empty master list and write a new one.
    #[default]
    Fresh,
    /// Abort the batch with `StoreNotFound`.
    Fail,
}

/// How to resolve several uploads in one batch sharing a document code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// The first upload in order wins.
    First,
    /// The upload with the highest revision number wins; ties keep the earlier one.
    #[default]
    HighestRevision,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub store_dir: PathBuf,
    pub master_xlsx_name: String,
    pub master_csv_name: String,
    /// Cell text identifying the master list header row.
    pub header_marker: String,
    /// Number of rows scanned from the top for the header row.
    pub header_scan_rows: usize,
    pub missing_store: MissingStorePolicy,
    pub duplicates: DuplicatePolicy,
    /// Responsible unit assigned to files uploaded without a folder.
    pub root_unit: String,
    /// When set, a root upload never replaces a unit already in the master
    /// list. Off by default: every non-empty upload value overwrites.
    pub keep_master_unit_for_root_uploads: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        ReconcileConfig {
            store_dir: PathBuf::from("."),
            master_xlsx_name: "Doküman Özet Listesi.xlsx".into(),
            master_csv_name: "Doküman Özet Listesi.csv".into(),
            header_marker: "Doküman Kodu".into(),
            header_scan_rows: 50,
            missing_store: MissingStorePolicy::default(),
            duplicates: DuplicatePolicy::default(),
            root_unit: "Ana Klasör".into(),
            keep_master_unit_for_root_uploads: false,
        }
    }
}

impl ReconcileConfig {
    pub fn master_xlsx_path(&self) -> PathBuf {
        self.store_dir.join(&self.master_xlsx_name)
    }

    pub fn master_csv_path(&self) -> PathBuf {
        self.store_dir.join(&self.master_csv_name)
    }
}

/// Load a config from a JSON file. Missing keys take their defaults.
pub fn load_config(path: &Path) -> Result<ReconcileConfig, BelgeError> {
    let content = std::fs::read_to_string(path).map_err(|e| BelgeError::Config {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_config(&content, path)
}

pub fn parse_config(json: &str, source: &Path) -> Result<ReconcileConfig, BelgeError> {
    let config: ReconcileConfig = serde_json::from_str(json).map_err(|e| BelgeError::Config {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    if config.header_marker.trim().is_empty() {
        return Err(BelgeError::Config {
            path: source.to_path_buf(),
            reason: "header_marker must not be empty".into(),
        });
    }
    if config.header_scan_rows == 0 {
        return Err(BelgeError::Config {
            path: source.to_path_buf(),
            reason: "header_scan_rows must be at least 1".into(),
        });
    }
    Ok(config)
}
