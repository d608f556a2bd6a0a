use crate::batch::UploadBatch;
use crate::notice::Notice;
use crate::state::SessionRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand one batch to the uploader. The reducer never emits this while a
    /// previous batch is still in flight.
    UploadBatch(UploadBatch),
    /// Surface a transient notice through the injected notifier.
    Notify(Notice),
    /// Re-list the backend roster after a completed processing phase.
    RefreshRoster,
    /// Persist the finished session's summary.
    RecordSession(SessionRecord),
}
