use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::data_dir;

pub const LABEL_CREATED: &str = "label-created";
pub const MIGRATED: &str = "migrated";
pub const FAILED: &str = "failed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: String,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Append-only JSONL record of one consolidation run.
pub struct Journal {
    path: PathBuf,
    written: AtomicUsize,
}

pub fn runs_dir() -> PathBuf {
    data_dir().join("runs")
}

impl Journal {
    /// Start a new journal file in `dir`, named after the current UTC time.
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let name = format!("run-{}.jsonl", chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ"));
        Ok(Self {
            path: dir.join(name),
            written: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &JournalEntry) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        let line = serde_json::to_string(entry)?;
        writeln!(file, "{line}")?;
        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Entries successfully appended so far.
    pub fn entries_written(&self) -> usize {
        self.written.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
pub fn read_entries(path: &Path) -> Vec<JournalEntry> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

pub fn new_entry(
    event: &str,
    space: Option<&str>,
    work_item_id: Option<&str>,
    label: Option<&str>,
    message: Option<&str>,
) -> JournalEntry {
    JournalEntry {
        timestamp: chrono::Utc::now().to_rfc3339(),
        event: event.to_string(),
        space: space.map(String::from),
        work_item_id: work_item_id.map(String::from),
        label: label.map(String::from),
        message: message.map(String::from),
    }
}
