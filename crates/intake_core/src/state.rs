use std::collections::VecDeque;

use crate::batch::{into_batches, UploadBatch};
use crate::validate::{SelectedFile, SelectionRules, SelectionScreen};
use crate::view_model::UploadViewModel;

/// Estimated backend processing time per accepted file, in seconds.
pub const PROCESSING_SECS_PER_FILE: u64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Uploading,
    Processing,
}

/// Running aggregate for one upload session. Reset by each new selection,
/// mutated only by the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadStats {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Files the backend acknowledged across completed batches.
    pub succeeded: usize,
    /// Files in the batch whose request failed.
    pub failed: usize,
    pub total_batches: usize,
    pub completed_batches: usize,
    pub invalid_files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Completed,
    Failed,
}

/// Snapshot of a finished session, handed to the app for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub outcome: SessionOutcome,
    pub stats: UploadStats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    rules: SelectionRules,
    session: SessionState,
    staged: Vec<SelectedFile>,
    pending: VecDeque<UploadBatch>,
    in_flight: Option<UploadBatch>,
    stats: UploadStats,
    upload_pct: u8,
    processing_pct: u8,
    processing_elapsed_secs: u64,
    processing_total_secs: u64,
    roster_count: Option<usize>,
    outcome: Option<SessionOutcome>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_rules(SelectionRules::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: SelectionRules) -> Self {
        Self {
            rules,
            session: SessionState::Idle,
            staged: Vec::new(),
            pending: VecDeque::new(),
            in_flight: None,
            stats: UploadStats::default(),
            upload_pct: 0,
            processing_pct: 0,
            processing_elapsed_secs: 0,
            processing_total_secs: 0,
            roster_count: None,
            outcome: None,
            dirty: false,
        }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn rules(&self) -> &SelectionRules {
        &self.rules
    }

    pub fn stats(&self) -> &UploadStats {
        &self.stats
    }

    pub fn view(&self) -> UploadViewModel {
        UploadViewModel {
            session: self.session,
            staged_files: self.staged.len(),
            stats: self.stats.clone(),
            upload_pct: self.upload_pct,
            processing_pct: self.processing_pct,
            roster_count: self.roster_count,
            outcome: self.outcome,
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn staged_is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    pub(crate) fn is_in_flight(&self, number: u32) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|batch| batch.number == number)
    }

    pub(crate) fn processed(&self) -> usize {
        self.stats.succeeded
    }

    pub(crate) fn upload_pct(&self) -> u8 {
        self.upload_pct
    }

    pub(crate) fn processing_pct(&self) -> u8 {
        self.processing_pct
    }

    pub(crate) fn processing_clock(&self) -> (u64, u64) {
        (self.processing_elapsed_secs, self.processing_total_secs)
    }

    /// Stage a screened selection: valid files are kept for upload, stats are
    /// reset to describe the new selection.
    pub(crate) fn apply_selection(&mut self, screen: SelectionScreen, total_selected: usize) {
        self.stats = UploadStats {
            total: total_selected,
            valid: screen.valid.len(),
            invalid: screen.rejected.len(),
            succeeded: 0,
            failed: 0,
            total_batches: screen.valid.len().div_ceil(self.rules.batch_size.max(1)),
            completed_batches: 0,
            invalid_files: screen.rejected,
        };
        self.staged = screen.valid;
        self.upload_pct = 0;
        self.processing_pct = 0;
        self.outcome = None;
        self.dirty = true;
    }

    /// Enter the uploading state: partition staged files into batches and put
    /// the first one in flight. Staged files must not be empty.
    pub(crate) fn begin_upload(&mut self) -> UploadBatch {
        let staged = std::mem::take(&mut self.staged);
        self.pending = into_batches(staged, self.rules.batch_size).into();
        self.stats.succeeded = 0;
        self.stats.failed = 0;
        self.stats.completed_batches = 0;
        self.upload_pct = 0;
        self.processing_pct = 0;
        self.outcome = None;
        self.session = SessionState::Uploading;
        self.dirty = true;

        let first = self.pending.pop_front().expect("at least one batch");
        self.in_flight = Some(first.clone());
        first
    }

    /// Record a settled batch and update the exact upload percentage.
    pub(crate) fn complete_batch(&mut self, accepted: usize) {
        self.in_flight = None;
        self.stats.completed_batches += 1;
        self.stats.succeeded += accepted;
        self.upload_pct = percent(
            self.stats.completed_batches as u64,
            self.stats.total_batches as u64,
        );
        self.dirty = true;
    }

    /// Put the next pending batch in flight, if any.
    pub(crate) fn next_batch(&mut self) -> Option<UploadBatch> {
        let next = self.pending.pop_front()?;
        self.in_flight = Some(next.clone());
        Some(next)
    }

    /// Record the in-flight batch as failed and drop every pending batch.
    /// Files in never-attempted batches count as neither succeeded nor failed.
    pub(crate) fn fail_batch(&mut self) {
        if let Some(batch) = self.in_flight.take() {
            self.stats.failed += batch.files.len();
        }
        self.pending.clear();
        self.dirty = true;
    }

    /// Enter the simulated processing phase, sized by the accepted-file count.
    pub(crate) fn begin_processing(&mut self) {
        self.session = SessionState::Processing;
        self.processing_elapsed_secs = 0;
        self.processing_total_secs = self.stats.succeeded as u64 * PROCESSING_SECS_PER_FILE;
        self.processing_pct = 0;
        self.dirty = true;
    }

    /// Advance the processing clock by one second. Returns true when the
    /// estimate is exhausted.
    pub(crate) fn tick_processing(&mut self) -> bool {
        self.processing_elapsed_secs += 1;
        self.processing_pct = percent(self.processing_elapsed_secs, self.processing_total_secs);
        self.dirty = true;
        self.processing_elapsed_secs >= self.processing_total_secs
    }

    /// Return to idle and snapshot the finished session.
    pub(crate) fn finish(&mut self, outcome: SessionOutcome) -> SessionRecord {
        self.session = SessionState::Idle;
        self.staged.clear();
        self.pending.clear();
        self.in_flight = None;
        self.outcome = Some(outcome);
        self.dirty = true;
        SessionRecord {
            outcome,
            stats: self.stats.clone(),
        }
    }

    pub(crate) fn set_roster_count(&mut self, count: usize) {
        self.roster_count = Some(count);
        self.dirty = true;
    }
}

/// Rounded percentage in [0, 100]; 0 when the denominator is 0.
fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * done as f64 / total as f64).round();
    pct.min(100.0) as u8
}
