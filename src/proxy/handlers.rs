use super::{relay::BackendRelay, types::HealthResponse};
use crate::{
    Error, Result,
    protocol::{GenerationResponse, INTERNAL_ERROR_MESSAGE, Operation},
};
use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

type RelayResponse = std::result::Result<Json<Value>, (StatusCode, Json<GenerationResponse>)>;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<BackendRelay>,
}

pub async fn generate_from_text(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> RelayResponse {
    let request_id = Uuid::new_v4();
    let body = match body {
        Ok(body) => body,
        Err(e) => return reject_body(request_id, Operation::GenerateFromText, e),
    };
    info!(
        "[{}] Received {} request ({} bytes)",
        request_id,
        Operation::GenerateFromText,
        body.len()
    );

    let outcome = state.relay.forward_text(&body).await;
    into_response(request_id, Operation::GenerateFromText, outcome)
}

pub async fn generate_from_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> RelayResponse {
    let request_id = Uuid::new_v4();
    let body = match body {
        Ok(body) => body,
        Err(e) => return reject_body(request_id, Operation::GenerateFromFile, e),
    };
    info!(
        "[{}] Received {} request ({} bytes)",
        request_id,
        Operation::GenerateFromFile,
        body.len()
    );

    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let outcome = state.relay.forward_file(content_type, body).await;
    into_response(request_id, Operation::GenerateFromFile, outcome)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Backend JSON goes back untouched with 200. Any relay failure collapses into
/// the fixed 500 body; the cause is only logged.
fn into_response(request_id: Uuid, operation: Operation, outcome: Result<Value>) -> RelayResponse {
    match outcome {
        Ok(value) => {
            info!("[{}] Relayed {} response", request_id, operation);
            Ok(Json(value))
        }
        Err(e) => {
            error!("[{}] Error relaying {}: {}", request_id, operation, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(GenerationResponse::failure(INTERNAL_ERROR_MESSAGE)),
            ))
        }
    }
}

/// Unreadable or oversized bodies get the same fixed 500 as relay failures.
fn reject_body(request_id: Uuid, operation: Operation, rejection: BytesRejection) -> RelayResponse {
    into_response(
        request_id,
        operation,
        Err(Error::proxy(format!(
            "failed to read request body: {}",
            rejection.body_text()
        ))),
    )
}
