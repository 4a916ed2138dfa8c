use super::{
    download::{DownloadLink, DownloadTrigger},
    transport::GenerationTransport,
    upload::FileUpload,
};
use crate::{
    Error, Result,
    protocol::{GenerationResponse, Operation, TextGenerationRequest, filename_or_default},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionEvent {
    Submit,
    Generated,
    Failed(String),
    Edit,
}

/// Everything the form shows. Owned by the controller; callers get copies.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub text: String,
    pub filename: String,
    pub phase: SubmissionPhase,
    pub error: Option<String>,
    pub success: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            text: String::new(),
            filename: String::new(),
            phase: SubmissionPhase::Idle,
            error: None,
            success: false,
        }
    }
}

impl FormState {
    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    pub fn transition(&mut self, event: SubmissionEvent) -> Result<()> {
        use SubmissionPhase::*;

        let old_phase = self.phase;
        let new_phase = match (old_phase, &event) {
            (Submitting, SubmissionEvent::Submit) => return Err(Error::SubmissionInFlight),
            (Idle | Succeeded | Failed, SubmissionEvent::Submit) => {
                self.error = None;
                self.success = false;
                Submitting
            }
            (Submitting, SubmissionEvent::Generated) => {
                self.success = true;
                Succeeded
            }
            (Submitting, SubmissionEvent::Failed(message)) => {
                self.error = Some(message.clone());
                Failed
            }
            (Succeeded | Failed, SubmissionEvent::Edit) => Idle,
            (Idle | Submitting, SubmissionEvent::Edit) => old_phase,
            _ => {
                warn!(
                    "Invalid submission transition from {:?} with event {:?}",
                    old_phase, event
                );
                return Err(Error::InvalidTransition {
                    current: format!("{old_phase:?}"),
                    requested: format!("{event:?}"),
                });
            }
        };

        if old_phase != new_phase {
            debug!("Submission phase: {:?} -> {:?}", old_phase, new_phase);
        }
        self.phase = new_phase;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Generated { filename: String },
    Failed { message: String },
}

/// Drives one form through submit → response → download, one request at a time.
///
/// A submit while another is in flight is refused with
/// [`Error::SubmissionInFlight`] and sends nothing. The state lock is never
/// held across the network call.
pub struct SubmissionController {
    transport: Arc<dyn GenerationTransport>,
    downloader: Arc<dyn DownloadTrigger>,
    state: Mutex<FormState>,
}

impl SubmissionController {
    pub fn new(
        transport: Arc<dyn GenerationTransport>,
        downloader: Arc<dyn DownloadTrigger>,
    ) -> Self {
        Self {
            transport,
            downloader,
            state: Mutex::new(FormState::default()),
        }
    }

    pub async fn snapshot(&self) -> FormState {
        self.state.lock().await.clone()
    }

    pub async fn set_text(&self, text: impl Into<String>) -> Result<()> {
        let mut state = self.state.lock().await;
        state.text = text.into();
        state.transition(SubmissionEvent::Edit)
    }

    pub async fn set_filename(&self, filename: impl Into<String>) -> Result<()> {
        let mut state = self.state.lock().await;
        state.filename = filename.into();
        state.transition(SubmissionEvent::Edit)
    }

    /// Sends the current text. Empty or whitespace-only text is sent as is.
    pub async fn submit_text(&self) -> Result<SubmissionOutcome> {
        let request = {
            let mut state = self.state.lock().await;
            state.transition(SubmissionEvent::Submit)?;
            TextGenerationRequest {
                text: state.text.clone(),
                filename: filename_or_default(&state.filename),
            }
        };
        let filename = request.filename.clone();

        info!("Submitting text for {}", filename);
        let result = self.transport.generate_from_text(request).await;

        self.finish(Operation::GenerateFromText, filename, result)
            .await
    }

    /// Handles a drop. Files the picker would reject are skipped, only the
    /// first remaining file is sent, and an empty drop changes nothing.
    pub async fn drop_files(&self, files: Vec<FileUpload>) -> Result<Option<SubmissionOutcome>> {
        let total = files.len();
        let Some(file) = files.into_iter().find(FileUpload::is_accepted) else {
            debug!("Drop of {} file(s) contained nothing acceptable", total);
            return Ok(None);
        };
        if total > 1 {
            debug!("Ignoring {} extra dropped file(s)", total - 1);
        }

        self.submit_file(file).await.map(Some)
    }

    /// Sends one file, skipping the picker filter.
    pub async fn submit_file(&self, file: FileUpload) -> Result<SubmissionOutcome> {
        let filename = {
            let mut state = self.state.lock().await;
            state.transition(SubmissionEvent::Submit)?;
            filename_or_default(&state.filename)
        };

        info!("Submitting {} for {}", file.name, filename);
        let result = self
            .transport
            .generate_from_file(file, filename.clone())
            .await;

        self.finish(Operation::GenerateFromFile, filename, result)
            .await
    }

    async fn finish(
        &self,
        operation: Operation,
        filename: String,
        result: Result<GenerationResponse>,
    ) -> Result<SubmissionOutcome> {
        let document = match result {
            Ok(GenerationResponse {
                success: true,
                document: Some(document),
                ..
            }) => Ok(document),
            Ok(response) => Err(response
                .error
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| operation.fallback_error().to_string())),
            Err(e) => {
                warn!("{} request failed: {}", operation, e);
                Err(operation.fallback_error().to_string())
            }
        };

        match document {
            Ok(document) => {
                self.state
                    .lock()
                    .await
                    .transition(SubmissionEvent::Generated)?;

                info!("Document generated: {}", filename);
                let link = DownloadLink::new(&document, filename.clone());
                if let Err(e) = self.downloader.trigger(&link).await {
                    warn!("Failed to save {}: {}", filename, e);
                }

                Ok(SubmissionOutcome::Generated { filename })
            }
            Err(message) => {
                self.state
                    .lock()
                    .await
                    .transition(SubmissionEvent::Failed(message.clone()))?;

                info!("{} failed: {}", operation, message);
                Ok(SubmissionOutcome::Failed { message })
            }
        }
    }
}
