use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use intake_core::{Effect, Msg};
use intake_engine::{EngineEvent, EngineHandle, StagedFile, UploadError, UploadSettings};
use intake_logging::{intake_info, intake_warn};

use crate::notify::Notifier;
use crate::persistence;

/// Executes reducer effects: batches and roster listings go to the engine,
/// notices to the injected notifier, session records to disk.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
    notifier: Box<dyn Notifier>,
    output_dir: PathBuf,
}

impl EffectRunner {
    pub(crate) fn new(
        settings: UploadSettings,
        notifier: Box<dyn Notifier>,
        output_dir: PathBuf,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, UploadError> {
        let (engine, event_rx) = EngineHandle::new(settings)?;
        spawn_event_pump(event_rx, msg_tx);
        Ok(Self {
            engine,
            notifier,
            output_dir,
        })
    }

    pub(crate) fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::UploadBatch(batch) => {
                    intake_info!(
                        "Dispatching batch {} ({} files)",
                        batch.number,
                        batch.files.len()
                    );
                    let files: Vec<StagedFile> = batch
                        .files
                        .into_iter()
                        .map(|file| StagedFile {
                            path: file.path,
                            name: file.name,
                        })
                        .collect();
                    self.engine.upload_batch(batch.number, files);
                }
                Effect::Notify(notice) => self.notifier.notify(&notice),
                Effect::RefreshRoster => self.engine.list_resumes(),
                Effect::RecordSession(record) => {
                    let finished_utc = Utc::now().to_rfc3339();
                    persistence::save_session_record(&self.output_dir, &record, &finished_utc);
                }
            }
        }
    }
}

/// Translate engine events into reducer messages on a dedicated thread.
fn spawn_event_pump(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                EngineEvent::BatchUploaded { batch_id, receipt } => Msg::BatchUploaded {
                    number: batch_id,
                    accepted: receipt.accepted,
                },
                EngineEvent::BatchFailed { batch_id, error } => {
                    intake_warn!("Batch {} failed: {}", batch_id, error.kind);
                    Msg::BatchFailed {
                        number: batch_id,
                        error: error.to_string(),
                    }
                }
                EngineEvent::RosterLoaded { resumes } => {
                    for resume in &resumes {
                        intake_info!("Roster entry: {}", resume.file_name);
                    }
                    Msg::RosterRefreshed {
                        count: resumes.len(),
                    }
                }
                EngineEvent::RosterFailed { error } => {
                    intake_warn!("Roster listing failed: {}", error.kind);
                    Msg::RosterRefreshFailed
                }
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}
