use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

pub type BatchId = u32;

/// A validated file queued for upload. Bytes are read from `path` at
/// dispatch time, not at selection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub name: String,
}

/// Acknowledgement for one uploaded batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadReceipt {
    /// Length of the backend's per-file result list.
    pub accepted: usize,
}

/// One entry of the backend's résumé listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResumeSummary {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "fileName", alias = "name")]
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    BatchUploaded {
        batch_id: BatchId,
        receipt: UploadReceipt,
    },
    BatchFailed {
        batch_id: BatchId,
        error: UploadError,
    },
    RosterLoaded {
        resumes: Vec<ResumeSummary>,
    },
    RosterFailed {
        error: UploadError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadError {
    pub kind: UploadFailureKind,
    pub message: String,
}

impl UploadError {
    pub(crate) fn new(kind: UploadFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UploadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    MalformedResponse,
    FileRead { name: String },
}

impl fmt::Display for UploadFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadFailureKind::InvalidUrl => write!(f, "invalid url"),
            UploadFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            UploadFailureKind::Timeout => write!(f, "timeout"),
            UploadFailureKind::Network => write!(f, "network error"),
            UploadFailureKind::MalformedResponse => write!(f, "malformed response"),
            UploadFailureKind::FileRead { name } => write!(f, "unreadable file {name}"),
        }
    }
}
