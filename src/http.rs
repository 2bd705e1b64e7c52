//! HTTP boundary: payload types, status mapping and the axum router.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::reconciliation::BatchCoordinator;
use crate::traits::RecordStore;
use crate::types::{BatchSummary, Notification};

/// Route receiving gateway transmission results.
pub const TRANSMISSION_PATH: &str = "/transmission";

/// Inbound batch as posted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmissionBatch {
    pub transmitted_files: Vec<TransmittedFile>,
}

/// One transmitted file and its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmittedFile {
    pub file_name: String,
    pub transmission_result: TransmissionResult,
}

/// Gateway result for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmissionResult {
    /// `SUCCESSFUL` or `ERROR`; other values fail the item, not the request.
    pub status: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub detail: String,
}

impl From<TransmittedFile> for Notification {
    fn from(file: TransmittedFile) -> Self {
        Notification {
            subject_id: file.file_name,
            outcome_status: file.transmission_result.status,
            outcome_code: file.transmission_result.code,
            outcome_detail: file.transmission_result.detail,
        }
    }
}

/// Response body for a processed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub error_count: usize,
    pub total_files: usize,
    pub success: bool,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

impl From<&BatchSummary> for BatchResponse {
    fn from(summary: &BatchSummary) -> Self {
        Self {
            message: summary.message.clone(),
            error_count: summary.error_count,
            total_files: summary.total_items,
            success: summary.success,
        }
    }
}

/// Response body for a payload that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub success: bool,
}

/// `200 OK` when every item reconciled, `207 Multi-Status` otherwise.
///
/// A batch is never rejected as a whole because of per-item failures.
pub fn summary_status(summary: &BatchSummary) -> StatusCode {
    if summary.error_count == 0 {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    }
}

/// Shared handler state.
pub struct AppState<S: RecordStore> {
    coordinator: Arc<BatchCoordinator<S>>,
}

impl<S: RecordStore> AppState<S> {
    pub fn new(coordinator: BatchCoordinator<S>) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }

    pub fn coordinator(&self) -> &BatchCoordinator<S> {
        &self.coordinator
    }
}

impl<S: RecordStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
        }
    }
}

/// Creates the service router.
pub fn router<S: RecordStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route(TRANSMISSION_PATH, post(handle_transmission::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_transmission<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Response {
    let batch: TransmissionBatch = match serde_json::from_slice(&body) {
        Ok(batch) => batch,
        Err(err) => {
            tracing::error!(error = %err, "invalid transmission payload");
            let body = ErrorResponse {
                message: format!("invalid request payload: {err}"),
                success: false,
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let notifications: Vec<Notification> = batch
        .transmitted_files
        .into_iter()
        .map(Notification::from)
        .collect();

    let summary = state.coordinator().process_batch(&notifications).await;
    let status = summary_status(&summary);

    (status, Json(BatchResponse::from(&summary))).into_response()
}
