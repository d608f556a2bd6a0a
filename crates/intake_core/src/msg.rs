#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Selector collected a set of file handles (picker or drop).
    FilesSelected(Vec<crate::SelectedFile>),
    /// User asked to start uploading the staged files.
    UploadRequested,
    /// A batch request settled successfully; `accepted` is the length of the
    /// backend's per-file result list.
    BatchUploaded { number: u32, accepted: usize },
    /// A batch request failed; carries the human-readable error text.
    BatchFailed { number: u32, error: String },
    /// One-second heartbeat; drives the processing estimate, ignored otherwise.
    Tick,
    /// Roster re-listing finished after a completed session.
    RosterRefreshed { count: usize },
    /// Roster re-listing failed; the refresh is abandoned.
    RosterRefreshFailed,
    /// Fallback for placeholder wiring.
    NoOp,
}
