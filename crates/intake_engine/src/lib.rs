//! Intake engine: network IO and command execution for the upload pipeline.
mod engine;
mod types;
mod upload;

pub use engine::EngineHandle;
pub use types::{
    BatchId, EngineEvent, ResumeSummary, StagedFile, UploadError, UploadFailureKind, UploadReceipt,
};
pub use upload::{ReqwestUploader, UploadSettings, Uploader};
