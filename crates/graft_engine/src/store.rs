use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use graft_core::Rule;
use graft_logging::graft_warn;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Fixed key the ordered rule list is stored under.
pub const STORAGE_KEY: &str = "graft_rules";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store directory missing or not writable: {0}")]
    StoreDir(String),
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Access to the persisted rule list. The engine only ever reads; writes
/// belong to the editor collaborator.
pub trait RuleStore: Send + Sync {
    /// Current rule snapshot. Unreadable storage degrades to an empty list,
    /// never an error.
    fn get(&self) -> Vec<Rule>;

    /// Replace the stored rule list.
    fn put(&self, rules: &[Rule]) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct StorageFile {
    #[serde(rename = "graft_rules", default)]
    rules: Vec<Rule>,
}

/// Rule list persisted as a JSON mapping from [`STORAGE_KEY`] to the ordered
/// list, written atomically (temp file then rename).
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleStore for JsonFileStore {
    fn get(&self) -> Vec<Rule> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                graft_warn!("Failed to read rule store {:?}: {}", self.path, err);
                return Vec::new();
            }
        };

        match serde_json::from_str::<StorageFile>(&content) {
            Ok(file) => file.rules,
            Err(err) => {
                graft_warn!("Failed to parse rule store {:?}: {}", self.path, err);
                Vec::new()
            }
        }
    }

    fn put(&self, rules: &[Rule]) -> Result<(), StoreError> {
        let file = StorageFile {
            rules: rules.to_vec(),
        };
        let content = serde_json::to_string_pretty(&file)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|err| StoreError::StoreDir(err.to_string()))?;

        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|err| StoreError::StoreDir(err.to_string()))?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace any existing file to keep determinism.
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        tmp.persist(&self.path).map_err(|err| StoreError::Io(err.error))?;
        Ok(())
    }
}

/// Creation-time id for a new rule, from the wall clock plus a caller-chosen
/// sequence number to break same-millisecond ties.
pub fn generate_rule_id(seq: u32) -> String {
    graft_core::new_rule_id(chrono::Utc::now().timestamp_millis(), seq)
}
