use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use intake_core::{SessionOutcome, SessionRecord};
use intake_logging::{intake_error, intake_info, intake_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

const SUMMARY_FILENAME: &str = ".intake_session.ron";

#[derive(Debug, Error)]
pub(crate) enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum PersistedOutcome {
    Completed,
    Failed,
}

/// On-disk form of a finished session's summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PersistedSummary {
    pub outcome: PersistedOutcome,
    pub finished_utc: String,
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_batches: usize,
    pub completed_batches: usize,
    pub invalid_files: Vec<String>,
}

pub(crate) fn save_session_record(dir: &Path, record: &SessionRecord, finished_utc: &str) {
    let summary = PersistedSummary {
        outcome: match record.outcome {
            SessionOutcome::Completed => PersistedOutcome::Completed,
            SessionOutcome::Failed => PersistedOutcome::Failed,
        },
        finished_utc: finished_utc.to_string(),
        total: record.stats.total,
        valid: record.stats.valid,
        invalid: record.stats.invalid,
        succeeded: record.stats.succeeded,
        failed: record.stats.failed,
        total_batches: record.stats.total_batches,
        completed_batches: record.stats.completed_batches,
        invalid_files: record.stats.invalid_files.clone(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&summary, pretty) {
        Ok(text) => text,
        Err(err) => {
            intake_error!("Failed to serialize session summary: {}", err);
            return;
        }
    };

    match write_atomic(dir, SUMMARY_FILENAME, &content) {
        Ok(path) => intake_info!("Recorded session summary at {:?}", path),
        Err(err) => intake_error!("Failed to write session summary in {:?}: {}", dir, err),
    }
}

pub(crate) fn load_last_session(dir: &Path) -> Option<PersistedSummary> {
    let path = dir.join(SUMMARY_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            intake_warn!("Failed to read session summary from {:?}: {}", path, err);
            return None;
        }
    };

    match ron::from_str(&content) {
        Ok(summary) => Some(summary),
        Err(err) => {
            intake_warn!("Failed to parse session summary from {:?}: {}", path, err);
            None
        }
    }
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then
/// renaming.
fn write_atomic(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
    if !dir.is_dir() {
        return Err(PersistError::OutputDir(format!("{dir:?}")));
    }

    let target = dir.join(filename);
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace existing file if present to keep determinism.
    if target.exists() {
        fs::remove_file(&target)?;
    }
    tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::UploadStats;

    fn record() -> SessionRecord {
        SessionRecord {
            outcome: SessionOutcome::Completed,
            stats: UploadStats {
                total: 7,
                valid: 6,
                invalid: 1,
                succeeded: 6,
                failed: 0,
                total_batches: 2,
                completed_batches: 2,
                invalid_files: vec!["x.docx: File type not supported. Please upload only PDF or TXT files.".to_string()],
            },
        }
    }

    #[test]
    fn summary_round_trips_through_ron() {
        let dir = tempfile::tempdir().expect("tempdir");
        save_session_record(dir.path(), &record(), "2026-08-06T12:00:00Z");

        let summary = load_last_session(dir.path()).expect("summary present");
        assert_eq!(summary.outcome, PersistedOutcome::Completed);
        assert_eq!(summary.finished_utc, "2026-08-06T12:00:00Z");
        assert_eq!(summary.total, 7);
        assert_eq!(summary.succeeded, 6);
        assert_eq!(summary.invalid_files.len(), 1);
    }

    #[test]
    fn save_overwrites_the_previous_summary() {
        let dir = tempfile::tempdir().expect("tempdir");
        save_session_record(dir.path(), &record(), "2026-08-06T12:00:00Z");

        let mut second = record();
        second.outcome = SessionOutcome::Failed;
        save_session_record(dir.path(), &second, "2026-08-06T13:00:00Z");

        let summary = load_last_session(dir.path()).expect("summary present");
        assert_eq!(summary.outcome, PersistedOutcome::Failed);
        assert_eq!(summary.finished_utc, "2026-08-06T13:00:00Z");
    }

    #[test]
    fn absent_summary_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_last_session(dir.path()), None);
    }
}
