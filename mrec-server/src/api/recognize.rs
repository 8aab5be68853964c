//! POST /recognize
//!
//! Request lifecycle:
//! `ReceivingUpload → Persisting (detached) → AwaitingRecognition →
//! {Normalizing → Success, NotFound, TransportError}`
//!
//! Exactly one recognition call per request. The stored copy is written on
//! its own task, so a storage failure never changes the terminal state.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::models::{RecognitionOutcome, TrackMetadata};
use crate::services::{normalize, RecognitionError};
use crate::AppState;

/// Multipart field carrying the clip
pub const AUDIO_FIELD: &str = "audio";

/// Body of the "not recognized" answer
pub const NOT_RECOGNIZED_MESSAGE: &str = "Failed to recognize audio";

/// "Not recognized" response body: `{"error": "Failed to recognize audio"}`
#[derive(Debug, Serialize, Deserialize)]
pub struct NotRecognizedResponse {
    pub error: String,
}

impl Default for NotRecognizedResponse {
    fn default() -> Self {
        Self {
            error: NOT_RECOGNIZED_MESSAGE.to_string(),
        }
    }
}

/// Non-exceptional terminal states of a recognition request
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionReply {
    Success(TrackMetadata),
    NotFound { status: u16 },
}

/// Run the pipeline for one clip
///
/// Starts the detached storage write, awaits the recognition service and
/// normalizes a match. `Err` is reserved for transport failures and timeouts.
pub async fn run_recognition(
    state: &AppState,
    payload: Bytes,
) -> Result<RecognitionReply, RecognitionError> {
    state.audio_store.store_detached(payload.clone());

    match state.recognizer.recognize(&payload).await? {
        RecognitionOutcome::Matched(raw) => {
            let metadata = normalize(&raw);
            tracing::info!(
                title = %metadata.title,
                artist = %metadata.artist,
                "Audio recognized"
            );
            Ok(RecognitionReply::Success(metadata))
        }
        RecognitionOutcome::NotFound { status } => Ok(RecognitionReply::NotFound { status }),
    }
}

/// POST /recognize
///
/// Multipart upload with the clip in the `audio` field.
#[tracing::instrument(skip(state, multipart))]
pub async fn recognize(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let payload = read_audio_field(&mut multipart).await?;

    tracing::debug!(bytes = payload.len(), "Audio upload received");

    match run_recognition(&state, payload).await {
        Ok(RecognitionReply::Success(metadata)) => Ok(Json(metadata).into_response()),
        Ok(RecognitionReply::NotFound { status }) => {
            let reply_status = if state.strict_status_codes {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            tracing::info!(
                upstream_status = status,
                reply_status = reply_status.as_u16(),
                "Audio not recognized"
            );
            Ok((reply_status, Json(NotRecognizedResponse::default())).into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Recognition request failed");
            *state.last_error.write().await = Some(e.to_string());
            Err(e.into())
        }
    }
}

/// Read the `audio` field, skipping any other fields
async fn read_audio_field(multipart: &mut Multipart) -> ApiResult<Bytes> {
    loop {
        let field = multipart.next_field().await.map_err(multipart_error)?;
        let Some(field) = field else {
            tracing::warn!("Recognize request without an audio field");
            return Err(ApiError::BadRequest(format!(
                "Missing multipart field '{}'",
                AUDIO_FIELD
            )));
        };

        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.is_empty() {
            return Err(ApiError::BadRequest("Audio upload is empty".to_string()));
        }
        return Ok(data);
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::warn!(error = %err, "Failed to read multipart upload");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Build recognition routes with the given upload limit
pub fn recognize_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/recognize", post(recognize))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
