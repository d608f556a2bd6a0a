use std::path::PathBuf;
use std::sync::Once;

use intake_core::{
    update, AppState, Effect, Msg, NoticeKind, NoticeTopic, SelectedFile, SessionOutcome,
    SessionState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(intake_logging::initialize_for_tests);
}

fn pdf(name: &str) -> SelectedFile {
    SelectedFile {
        path: PathBuf::from(name),
        name: name.to_string(),
        size: 1024,
    }
}

fn txt(name: &str) -> SelectedFile {
    SelectedFile {
        path: PathBuf::from(name),
        name: name.to_string(),
        size: 512,
    }
}

fn select(state: AppState, files: Vec<SelectedFile>) -> (AppState, Vec<Effect>) {
    update(state, Msg::FilesSelected(files))
}

fn notices(effects: &[Effect]) -> Vec<(NoticeTopic, NoticeKind, String)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Notify(notice) => Some((notice.topic, notice.kind, notice.text.clone())),
            _ => None,
        })
        .collect()
}

fn dispatched_batches(effects: &[Effect]) -> Vec<u32> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::UploadBatch(batch) => Some(batch.number),
            _ => None,
        })
        .collect()
}

#[test]
fn three_valid_files_form_one_batch() {
    init_logging();
    let files = vec![pdf("a.pdf"), pdf("b.pdf"), pdf("c.pdf")];

    let (state, effects) = select(AppState::new(), files);
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.stats.total, 3);
    assert_eq!(view.stats.valid, 3);
    assert_eq!(view.stats.invalid, 0);
    assert_eq!(view.stats.total_batches, 1);
    assert_eq!(view.staged_files, 3);

    let (state, effects) = update(state, Msg::UploadRequested);
    assert_eq!(state.view().session, SessionState::Uploading);
    assert_eq!(dispatched_batches(&effects), vec![1]);
    let texts = notices(&effects);
    assert_eq!(
        texts,
        vec![(
            NoticeTopic::Upload,
            NoticeKind::Loading,
            "Preparing upload...".to_string()
        )]
    );
}

#[test]
fn invalid_only_selection_stages_nothing() {
    init_logging();
    let (state, effects) = select(AppState::new(), vec![pdf("resume.docx")]);

    let view = state.view();
    assert_eq!(view.stats.total, 1);
    assert_eq!(view.stats.valid, 0);
    assert_eq!(view.stats.invalid, 1);
    assert_eq!(
        view.stats.invalid_files,
        vec!["resume.docx: File type not supported. Please upload only PDF or TXT files."
            .to_string()]
    );
    assert_eq!(notices(&effects).len(), 1);
    assert_eq!(notices(&effects)[0].0, NoticeTopic::Selection);

    // With no valid files staged, an upload request does not start a session.
    let (state, effects) = update(state, Msg::UploadRequested);
    assert_eq!(state.view().session, SessionState::Idle);
    assert!(dispatched_batches(&effects).is_empty());
    assert_eq!(
        notices(&effects),
        vec![(
            NoticeTopic::Upload,
            NoticeKind::Error,
            "Please select valid files to upload.".to_string()
        )]
    );
}

#[test]
fn oversized_selection_rejected_without_state_change() {
    init_logging();
    let state = AppState::new();
    let before = state.view();
    let files: Vec<SelectedFile> = (0..60).map(|i| pdf(&format!("cv{i}.pdf"))).collect();

    let (mut state, effects) = select(state, files);

    assert_eq!(state.view(), before);
    assert!(!state.consume_dirty());
    assert_eq!(
        notices(&effects),
        vec![(
            NoticeTopic::Selection,
            NoticeKind::Error,
            "You can select up to 50 files at once.".to_string()
        )]
    );
}

#[test]
fn seven_files_upload_in_two_sequential_batches() {
    init_logging();
    let files: Vec<SelectedFile> = (0..7).map(|i| txt(&format!("cv{i}.txt"))).collect();
    let (state, _) = select(AppState::new(), files);
    let (state, effects) = update(state, Msg::UploadRequested);
    assert_eq!(dispatched_batches(&effects), vec![1]);
    assert_eq!(state.view().stats.total_batches, 2);

    // Batch 1 settles: progress 50%, batch 2 goes in flight.
    let (state, effects) = update(
        state,
        Msg::BatchUploaded {
            number: 1,
            accepted: 5,
        },
    );
    assert_eq!(state.view().upload_pct, 50);
    assert_eq!(state.view().stats.completed_batches, 1);
    assert_eq!(dispatched_batches(&effects), vec![2]);
    assert_eq!(
        notices(&effects),
        vec![(
            NoticeTopic::Upload,
            NoticeKind::Loading,
            "Uploading files... 50% (Batch 1/2)".to_string()
        )]
    );

    // Batch 2 settles: progress 100%, all seven accepted, processing begins.
    let (state, effects) = update(
        state,
        Msg::BatchUploaded {
            number: 2,
            accepted: 2,
        },
    );
    let view = state.view();
    assert_eq!(view.upload_pct, 100);
    assert_eq!(view.stats.succeeded, 7);
    assert_eq!(view.session, SessionState::Processing);
    assert!(dispatched_batches(&effects).is_empty());
    let texts: Vec<String> = notices(&effects).into_iter().map(|(_, _, t)| t).collect();
    assert_eq!(
        texts,
        vec![
            "Uploading files... 100% (Batch 2/2)".to_string(),
            "Upload complete!".to_string(),
            "Processing files...".to_string(),
        ]
    );
}

#[test]
fn upload_progress_is_monotonic_and_rounded() {
    init_logging();
    let files: Vec<SelectedFile> = (0..11).map(|i| pdf(&format!("cv{i}.pdf"))).collect();
    let (state, _) = select(AppState::new(), files);
    let (mut state, _) = update(state, Msg::UploadRequested);
    assert_eq!(state.view().stats.total_batches, 3);

    let mut last_pct = 0;
    for (number, accepted, expected_pct) in [(1, 5, 33), (2, 5, 67), (3, 1, 100)] {
        let (next, _) = update(state, Msg::BatchUploaded { number, accepted });
        state = next;
        let pct = state.view().upload_pct;
        assert_eq!(pct, expected_pct);
        assert!(pct >= last_pct);
        last_pct = pct;
    }
}

#[test]
fn batch_failure_aborts_remaining_batches() {
    init_logging();
    let files: Vec<SelectedFile> = (0..6).map(|i| pdf(&format!("cv{i}.pdf"))).collect();
    let (state, _) = select(AppState::new(), files);
    let (state, _) = update(state, Msg::UploadRequested);
    let (state, _) = update(
        state,
        Msg::BatchUploaded {
            number: 1,
            accepted: 5,
        },
    );
    assert_eq!(state.view().upload_pct, 50);

    let (state, effects) = update(
        state,
        Msg::BatchFailed {
            number: 2,
            error: "500 Internal Server Error".to_string(),
        },
    );

    let view = state.view();
    assert_eq!(view.session, SessionState::Idle);
    assert_eq!(view.outcome, Some(SessionOutcome::Failed));
    assert_eq!(view.stats.completed_batches, 1);
    assert_eq!(view.stats.total_batches, 2);
    assert_eq!(view.stats.succeeded, 5);
    assert_eq!(view.stats.failed, 1);
    // No further batch is dispatched and no processing phase begins.
    assert!(dispatched_batches(&effects).is_empty());
    let (topic, kind, text) = notices(&effects)[0].clone();
    assert_eq!(topic, NoticeTopic::Upload);
    assert_eq!(kind, NoticeKind::Error);
    assert_eq!(text, "Failed to upload batch 2: 500 Internal Server Error");
    assert!(effects.iter().any(|effect| matches!(
        effect,
        Effect::RecordSession(record) if record.outcome == SessionOutcome::Failed
    )));
}

#[test]
fn stale_batch_events_are_ignored() {
    init_logging();
    let files = vec![pdf("a.pdf")];
    let (state, _) = select(AppState::new(), files);
    let (mut state, _) = update(state, Msg::UploadRequested);
    state.consume_dirty();

    // Wrong batch number: nothing settles.
    let (mut state, effects) = update(
        state,
        Msg::BatchUploaded {
            number: 9,
            accepted: 1,
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state.view().stats.completed_batches, 0);
}

#[test]
fn selection_is_ignored_while_uploading() {
    init_logging();
    let (state, _) = select(AppState::new(), vec![pdf("a.pdf")]);
    let (state, _) = update(state, Msg::UploadRequested);

    let (state, effects) = select(state, vec![pdf("b.pdf")]);
    assert!(effects.is_empty());
    assert_eq!(state.view().stats.total, 1);
    assert_eq!(state.view().session, SessionState::Uploading);
}
