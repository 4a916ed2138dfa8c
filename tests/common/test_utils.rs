use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use docgen::{
    client::{FileUpload, SubmissionController},
    proxy::{self, BackendRelay},
};
use serde_json::Value;
use std::{net::SocketAddr, sync::Arc};

use super::mocks::{MockTransport, RecordingDownloader};

pub const TEST_BODY_LIMIT: usize = 1024 * 1024;
pub const MULTIPART_BOUNDARY: &str = "docgen-test-boundary";

/// Bytes that stand in for a generated document
pub const DOCX_BYTES: &[u8] = b"PK\x03\x04 generated docx";

pub fn docx_base64() -> String {
    STANDARD.encode(DOCX_BYTES)
}

/// Relay router pointed at the given backend
pub fn create_test_router(backend_url: &str) -> Router {
    proxy::router(Arc::new(BackendRelay::new(backend_url)), TEST_BODY_LIMIT)
}

/// Serve the relay on an ephemeral port and return its base URL
pub async fn spawn_relay(backend_url: &str) -> String {
    let app = create_test_router(backend_url);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn create_controller(
    transport: MockTransport,
) -> (
    SubmissionController,
    Arc<MockTransport>,
    Arc<RecordingDownloader>,
) {
    let transport = Arc::new(transport);
    let downloader = Arc::new(RecordingDownloader::new());
    let controller = SubmissionController::new(transport.clone(), downloader.clone());
    (controller, transport, downloader)
}

pub fn docx_upload(name: &str) -> FileUpload {
    FileUpload::new(name, b"source document".to_vec())
}

/// Hand-built multipart body with a `file` part and a `filename` field
pub fn multipart_body(file_name: &str, file_bytes: &[u8], filename: &str) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"filename\"\r\n\r\n",
    );
    body.extend_from_slice(filename.as_bytes());
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}")
}

pub fn json_request(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn response_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
