//! Durable persistence for workflow state.
//!
//! The store owns the on-disk layout: the main JSON document (overwritten
//! atomically on every save), the append-only JSONL history log, and the
//! backup directory. It never holds the document in memory between calls;
//! each process invocation loads fresh and saves before exit. Concurrent
//! invocations are not mutually excluded: the main document is
//! last-writer-wins, while the history log is safe under concurrent
//! appenders because every writer only appends its own line.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::WorkspacePaths;

use super::state::{merge_with_defaults, HistoryEntry, WorkflowState};

/// Errors that can occur during durable-state operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Filesystem-backed store for one workspace's workflow state.
#[derive(Debug, Clone)]
pub struct StateStore {
    state_file: PathBuf,
    history_file: PathBuf,
    backup_dir: PathBuf,
}

impl StateStore {
    /// Open a store for the given workspace layout, creating the work and
    /// backup directories if they do not exist yet.
    pub fn open(paths: &WorkspacePaths) -> Result<Self, StoreError> {
        fs::create_dir_all(paths.work_dir())?;
        fs::create_dir_all(paths.backup_dir())?;
        Ok(Self {
            state_file: paths.state_file(),
            history_file: paths.history_file(),
            backup_dir: paths.backup_dir(),
        })
    }

    /// Load the durable document.
    ///
    /// Missing documents yield defaults; so do corrupt or undecodable ones
    /// (silent recovery, the caller is never failed). Partial legacy
    /// documents get a two-level merge against defaults.
    pub fn load(&self) -> WorkflowState {
        let raw = match fs::read_to_string(&self.state_file) {
            Ok(raw) => raw,
            Err(_) => return WorkflowState::default(),
        };
        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(doc) => merge_with_defaults(doc).unwrap_or_else(|| {
                warn!(path = %self.state_file.display(), "undecodable state document, using defaults");
                WorkflowState::default()
            }),
            Err(err) => {
                debug!(%err, "corrupt state document, using defaults");
                WorkflowState::default()
            }
        }
    }

    /// Persist the document, stamping `session.last_activity`.
    ///
    /// The write goes to a temp file first and is renamed into place, so a
    /// crash mid-write never leaves a half-written document behind.
    pub fn save(&self, state: &mut WorkflowState) -> Result<(), StoreError> {
        state.session.last_activity = Some(Utc::now());
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.state_file.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.state_file)?;
        Ok(())
    }

    /// Copy the current durable document to a timestamped, reason-tagged
    /// backup file. Returns `None` when no document exists yet (a no-op,
    /// not a failure).
    pub fn backup(&self, reason: &str) -> Result<Option<PathBuf>, StoreError> {
        if !self.state_file.exists() {
            return Ok(None);
        }
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let backup_path = self
            .backup_dir
            .join(format!("vibe-state_{stamp}_{reason}.json"));
        fs::copy(&self.state_file, &backup_path)?;
        debug!(path = %backup_path.display(), reason, "state backup created");
        Ok(Some(backup_path))
    }

    /// Append one entry to the in-memory history and durably append the
    /// same entry to the JSONL log. The log write is independent of the
    /// main document save, so history survives even when a save is skipped.
    pub fn append_history(
        &self,
        state: &mut WorkflowState,
        message: &str,
    ) -> Result<(), StoreError> {
        let entry = HistoryEntry {
            timestamp: Utc::now(),
            message: message.to_string(),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        let mut log = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.history_file)?;
        log.write_all(line.as_bytes())?;
        state.history.push(entry);
        Ok(())
    }
}
