use super::upload::FileUpload;
use crate::{
    Result,
    protocol::{GenerationResponse, Operation, TextGenerationRequest},
};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

/// How the submission controller reaches the relay.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn generate_from_text(
        &self,
        request: TextGenerationRequest,
    ) -> Result<GenerationResponse>;

    async fn generate_from_file(
        &self,
        file: FileUpload,
        filename: String,
    ) -> Result<GenerationResponse>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn read_response(response: reqwest::Response) -> Result<GenerationResponse> {
        // The relay reports failures in the body, so the status is not checked.
        debug!("Relay answered with status {}", response.status());
        Ok(response.json::<GenerationResponse>().await?)
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    async fn generate_from_text(
        &self,
        request: TextGenerationRequest,
    ) -> Result<GenerationResponse> {
        let url = Operation::GenerateFromText.url(&self.base_url);
        debug!("Posting {} characters of text to {}", request.text.len(), url);

        let response = self.client.post(&url).json(&request).send().await?;
        Self::read_response(response).await
    }

    async fn generate_from_file(
        &self,
        file: FileUpload,
        filename: String,
    ) -> Result<GenerationResponse> {
        let url = Operation::GenerateFromFile.url(&self.base_url);
        debug!("Posting {} ({} bytes) to {}", file.name, file.bytes.len(), url);

        let mut part = Part::bytes(file.bytes).file_name(file.name);
        if let Some(content_type) = file.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part("file", part).text("filename", filename);

        let response = self.client.post(&url).multipart(form).send().await?;
        Self::read_response(response).await
    }
}
