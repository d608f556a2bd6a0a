//! Intake core: pure upload state machine and view-model helpers.
mod batch;
mod effect;
mod msg;
mod notice;
mod state;
mod update;
mod validate;
mod view_model;

pub use batch::{into_batches, UploadBatch};
pub use effect::Effect;
pub use msg::Msg;
pub use notice::{Notice, NoticeKind, NoticeTopic};
pub use state::{
    AppState, SessionOutcome, SessionRecord, SessionState, UploadStats, PROCESSING_SECS_PER_FILE,
};
pub use update::update;
pub use validate::{
    screen_selection, validate_file, RejectReason, SelectedFile, SelectionRules, SelectionScreen,
    TooManySelected,
};
pub use view_model::UploadViewModel;
