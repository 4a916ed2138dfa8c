use crate::{Error, Result, protocol::Operation};
use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

/// Forwards generation requests to the formatting backend.
///
/// The base URL is fixed at construction. Nothing is retried and no timeout
/// beyond the client default applies.
pub struct BackendRelay {
    client: reqwest::Client,
    base_url: String,
}

impl BackendRelay {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn target(&self, operation: Operation) -> String {
        operation.url(&self.base_url)
    }

    /// Relays a JSON body to `generate-from-text`. The body must parse as JSON
    /// but its shape is left to the backend.
    pub async fn forward_text(&self, body: &[u8]) -> Result<Value> {
        let payload: Value = serde_json::from_slice(body)?;
        let target = self.target(Operation::GenerateFromText);

        debug!("Forwarding text request to {}", target);

        let response = self
            .client
            .post(&target)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&payload)?)
            .send()
            .await?;

        read_backend_json(response).await
    }

    /// Relays a multipart upload to `generate-from-file` without re-encoding it.
    /// The original content type, boundary included, travels with the body.
    pub async fn forward_file(&self, content_type: Option<&str>, body: Bytes) -> Result<Value> {
        let content_type = content_type
            .filter(|ct| is_multipart(ct))
            .ok_or_else(|| Error::proxy("expected a multipart/form-data upload"))?;
        let target = self.target(Operation::GenerateFromFile);

        debug!("Forwarding {} byte upload to {}", body.len(), target);

        let response = self
            .client
            .post(&target)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        read_backend_json(response).await
    }
}

async fn read_backend_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        // Errors are carried in-band; the status only goes to the log.
        debug!("Backend answered with status {}", status);
    }
    Ok(response.json::<Value>().await?)
}

fn is_multipart(content_type: &str) -> bool {
    content_type
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
}
