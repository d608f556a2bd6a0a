use std::sync::{mpsc, Arc};
use std::thread;

use intake_logging::{intake_info, intake_warn};

use crate::upload::{ReqwestUploader, UploadSettings, Uploader};
use crate::{BatchId, EngineEvent, StagedFile, UploadError};

enum EngineCommand {
    UploadBatch {
        batch_id: BatchId,
        files: Vec<StagedFile>,
    },
    ListResumes,
}

/// Handle to the engine thread. Commands are executed strictly one at a
/// time, in order, so at most one request is in flight.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Spawn the engine thread and return the handle plus the event stream.
    pub fn new(
        settings: UploadSettings,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), UploadError> {
        let uploader = Arc::new(ReqwestUploader::new(settings)?);
        Ok(Self::with_uploader(uploader))
    }

    pub fn with_uploader(uploader: Arc<dyn Uploader>) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                runtime.block_on(handle_command(uploader.as_ref(), command, &event_tx));
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn upload_batch(&self, batch_id: BatchId, files: Vec<StagedFile>) {
        let _ = self.cmd_tx.send(EngineCommand::UploadBatch { batch_id, files });
    }

    pub fn list_resumes(&self) {
        let _ = self.cmd_tx.send(EngineCommand::ListResumes);
    }
}

async fn handle_command(
    uploader: &dyn Uploader,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::UploadBatch { batch_id, files } => {
            intake_info!("Uploading batch {} ({} files)", batch_id, files.len());
            let event = match uploader.upload_batch(&files).await {
                Ok(receipt) => EngineEvent::BatchUploaded { batch_id, receipt },
                Err(error) => {
                    intake_warn!("Batch {} failed: {}", batch_id, error.kind);
                    EngineEvent::BatchFailed { batch_id, error }
                }
            };
            let _ = event_tx.send(event);
        }
        EngineCommand::ListResumes => {
            let event = match uploader.list_resumes().await {
                Ok(resumes) => {
                    intake_info!("Roster listed ({} resumes)", resumes.len());
                    EngineEvent::RosterLoaded { resumes }
                }
                Err(error) => {
                    intake_warn!("Roster listing failed: {}", error.kind);
                    EngineEvent::RosterFailed { error }
                }
            };
            let _ = event_tx.send(event);
        }
    }
}
