use crate::validate::screen_selection;
use crate::{
    AppState, Effect, Msg, Notice, NoticeTopic, SelectedFile, SessionOutcome, SessionState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(files) => handle_selection(&mut state, files),
        Msg::UploadRequested => handle_upload_requested(&mut state),
        Msg::BatchUploaded { number, accepted } => {
            handle_batch_uploaded(&mut state, number, accepted)
        }
        Msg::BatchFailed { number, error } => handle_batch_failed(&mut state, number, &error),
        Msg::Tick => handle_tick(&mut state),
        Msg::RosterRefreshed { count } => {
            state.set_roster_count(count);
            Vec::new()
        }
        Msg::RosterRefreshFailed | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn handle_selection(state: &mut AppState, files: Vec<SelectedFile>) -> Vec<Effect> {
    // Selections are only accepted while idle; an active session keeps its
    // staged set.
    if state.session() != SessionState::Idle || files.is_empty() {
        return Vec::new();
    }

    let total_selected = files.len();
    match screen_selection(files, state.rules()) {
        Err(too_many) => {
            // Whole-selection refusal: no stats change, no partial acceptance.
            vec![Effect::Notify(Notice::error(
                NoticeTopic::Selection,
                format!("You can select up to {} files at once.", too_many.max),
            ))]
        }
        Ok(screen) => {
            let mut effects = Vec::new();
            if !screen.rejected.is_empty() {
                effects.push(Effect::Notify(Notice::error(
                    NoticeTopic::Selection,
                    screen.rejected.join("\n"),
                )));
            }
            state.apply_selection(screen, total_selected);
            effects
        }
    }
}

fn handle_upload_requested(state: &mut AppState) -> Vec<Effect> {
    if state.session() != SessionState::Idle {
        return Vec::new();
    }
    if state.staged_is_empty() {
        return vec![Effect::Notify(Notice::error(
            NoticeTopic::Upload,
            "Please select valid files to upload.",
        ))];
    }

    let first = state.begin_upload();
    vec![
        Effect::Notify(Notice::loading(NoticeTopic::Upload, "Preparing upload...")),
        Effect::UploadBatch(first),
    ]
}

fn handle_batch_uploaded(state: &mut AppState, number: u32, accepted: usize) -> Vec<Effect> {
    if state.session() != SessionState::Uploading || !state.is_in_flight(number) {
        return Vec::new();
    }

    state.complete_batch(accepted);
    let total_batches = state.stats().total_batches;
    let mut effects = vec![Effect::Notify(Notice::loading(
        NoticeTopic::Upload,
        format!(
            "Uploading files... {}% (Batch {number}/{total_batches})",
            state.upload_pct()
        ),
    ))];

    match state.next_batch() {
        Some(next) => effects.push(Effect::UploadBatch(next)),
        None => {
            effects.push(Effect::Notify(Notice::success(
                NoticeTopic::Upload,
                "Upload complete!",
            )));
            if state.processed() > 0 {
                state.begin_processing();
                effects.push(Effect::Notify(Notice::loading(
                    NoticeTopic::Processing,
                    "Processing files...",
                )));
            } else {
                // Nothing accepted: skip the processing phase entirely.
                let record = state.finish(SessionOutcome::Completed);
                effects.push(Effect::RecordSession(record));
            }
        }
    }
    effects
}

fn handle_batch_failed(state: &mut AppState, number: u32, error: &str) -> Vec<Effect> {
    if state.session() != SessionState::Uploading || !state.is_in_flight(number) {
        return Vec::new();
    }

    state.fail_batch();
    let record = state.finish(SessionOutcome::Failed);
    vec![
        Effect::Notify(Notice::error(
            NoticeTopic::Upload,
            format!("Failed to upload batch {number}: {error}"),
        )),
        Effect::RecordSession(record),
    ]
}

fn handle_tick(state: &mut AppState) -> Vec<Effect> {
    if state.session() != SessionState::Processing {
        return Vec::new();
    }

    let done = state.tick_processing();
    let (elapsed, total) = state.processing_clock();
    let mut effects = vec![Effect::Notify(Notice::loading(
        NoticeTopic::Processing,
        format!(
            "Processing files... {}% ({elapsed}s/{total}s)",
            state.processing_pct()
        ),
    ))];

    if done {
        effects.push(Effect::Notify(Notice::success(
            NoticeTopic::Processing,
            "Processing complete!",
        )));
        effects.push(Effect::RefreshRoster);
        let record = state.finish(SessionOutcome::Completed);
        effects.push(Effect::RecordSession(record));
    }
    effects
}
