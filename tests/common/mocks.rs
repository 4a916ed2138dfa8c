use async_trait::async_trait;
use docgen::{
    Error, Result,
    client::{DownloadLink, DownloadTrigger, FileUpload, GenerationTransport},
    protocol::{GenerationResponse, TextGenerationRequest},
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Lets a test hold a mock request open until it says so.
#[derive(Debug, Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// Mock transport for testing
#[derive(Default)]
pub struct MockTransport {
    pub responses: Mutex<VecDeque<Result<GenerationResponse>>>,
    pub text_requests: Mutex<Vec<TextGenerationRequest>>,
    pub file_requests: Mutex<Vec<(FileUpload, String)>>,
    pub gate: Option<Arc<Gate>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: GenerationResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_error(self, error: Error) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_gate(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn request_count(&self) -> usize {
        self.text_requests.lock().unwrap().len() + self.file_requests.lock().unwrap().len()
    }

    async fn next_response(&self) -> Result<GenerationResponse> {
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::internal("No more mock responses available")))
    }
}

#[async_trait]
impl GenerationTransport for MockTransport {
    async fn generate_from_text(
        &self,
        request: TextGenerationRequest,
    ) -> Result<GenerationResponse> {
        self.text_requests.lock().unwrap().push(request);
        self.next_response().await
    }

    async fn generate_from_file(
        &self,
        file: FileUpload,
        filename: String,
    ) -> Result<GenerationResponse> {
        self.file_requests.lock().unwrap().push((file, filename));
        self.next_response().await
    }
}

/// Download trigger that only remembers what it was given
#[derive(Debug, Default)]
pub struct RecordingDownloader {
    pub links: Mutex<Vec<DownloadLink>>,
    pub fail: bool,
}

impl RecordingDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn links(&self) -> Vec<DownloadLink> {
        self.links.lock().unwrap().clone()
    }
}

#[async_trait]
impl DownloadTrigger for RecordingDownloader {
    async fn trigger(&self, link: &DownloadLink) -> Result<()> {
        self.links.lock().unwrap().push(link.clone());
        if self.fail {
            return Err(Error::download("disk full"));
        }
        Ok(())
    }
}
