use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use intake_core::{
    update, AppState, Effect, Msg, SelectedFile, SelectionRules, SessionOutcome, SessionState,
};
use intake_engine::UploadSettings;
use intake_logging::intake_info;

use crate::effects::EffectRunner;
use crate::notify::Notifier;
use crate::persistence;

pub(crate) struct RunOptions {
    pub files: Vec<SelectedFile>,
    pub rules: SelectionRules,
    pub settings: UploadSettings,
    pub output_dir: PathBuf,
}

/// Drive one upload session to its terminal state. Returns the session
/// outcome, or `None` when nothing was staged for upload.
pub(crate) fn run(
    options: RunOptions,
    notifier: Box<dyn Notifier>,
) -> anyhow::Result<Option<SessionOutcome>> {
    if let Some(last) = persistence::load_last_session(&options.output_dir) {
        intake_info!(
            "Previous session {:?}: {} succeeded, {} failed, finished {}",
            last.outcome,
            last.succeeded,
            last.failed,
            last.finished_utc
        );
    }

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let mut runner = EffectRunner::new(
        options.settings,
        notifier,
        options.output_dir,
        msg_tx.clone(),
    )
    .context("starting upload engine")?;

    // One-second heartbeat for the processing estimate.
    thread::spawn(move || {
        let interval = Duration::from_secs(1);
        while msg_tx.send(Msg::Tick).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut state = AppState::with_rules(options.rules);

    // Seed the session: selection, then the upload request.
    let (next, effects) = update(state, Msg::FilesSelected(options.files));
    state = next;
    runner.run(effects);
    render_if_dirty(&mut state);

    let (next, effects) = update(state, Msg::UploadRequested);
    state = next;
    runner.run(effects);
    render_if_dirty(&mut state);

    if state.session() == SessionState::Idle {
        // Nothing staged (empty or fully invalid selection); the notices
        // already said why.
        return Ok(None);
    }

    let mut awaiting_roster = false;
    while let Ok(msg) = msg_rx.recv() {
        if matches!(msg, Msg::RosterRefreshed { .. } | Msg::RosterRefreshFailed) {
            awaiting_roster = false;
        }

        let (next, effects) = update(state, msg);
        state = next;
        if effects
            .iter()
            .any(|effect| matches!(effect, Effect::RefreshRoster))
        {
            awaiting_roster = true;
        }
        runner.run(effects);
        render_if_dirty(&mut state);

        if state.view().outcome.is_some() && !awaiting_roster {
            break;
        }
    }

    Ok(state.view().outcome)
}

fn render_if_dirty(state: &mut AppState) {
    if !state.consume_dirty() {
        return;
    }
    let view = state.view();
    intake_info!(
        "session={:?} files={}/{} batches={}/{} upload={}% processing={}%",
        view.session,
        view.stats.valid,
        view.stats.total,
        view.stats.completed_batches,
        view.stats.total_batches,
        view.upload_pct,
        view.processing_pct
    );
    if let Some(count) = view.roster_count {
        intake_info!("Backend roster now lists {} resume(s)", count);
    }
}
