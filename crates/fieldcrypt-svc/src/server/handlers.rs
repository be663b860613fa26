//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::{
    protocol::{
        DecryptRequest, EncryptRequest, ErrorResponse, HashRequest, HashResponse, RecordResponse,
    },
    ServiceError,
};
use fieldcrypt::{index_hash, RecordCodec};
use tracing::{error, warn};

use super::state::AppState;

/// `POST /encrypt`: encrypt every string leaf of the request payload.
///
/// Returns `503` until the startup self-test has passed.
pub async fn encrypt(
    State(state): State<AppState>,
    body: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    if !state.ready() {
        return error_response(&not_ready());
    }
    let req = match parse_body(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };

    let cipher = state.cipher.clone();
    let result =
        tokio::task::spawn_blocking(move || RecordCodec::new(&cipher).encrypt_record(&req.payload))
            .await;

    match result {
        Ok(Ok(payload)) => (StatusCode::OK, Json(RecordResponse { payload })).into_response(),
        Ok(Err(e)) => {
            warn!(error = %e, "record encryption failed");
            error_response(&ServiceError::EncryptionFailure("encryption failed".into()))
        }
        Err(e) => {
            error!(error = %e, "encryption task failed");
            error_response(&ServiceError::Internal("encryption task failed".into()))
        }
    }
}

/// `POST /decrypt`: recover every string leaf of the request payload.
///
/// Leaves that are not envelopes come back unchanged unless `strict` is set,
/// in which case any such leaf fails the whole request with `422`.
pub async fn decrypt(
    State(state): State<AppState>,
    body: Result<Json<DecryptRequest>, JsonRejection>,
) -> Response {
    if !state.ready() {
        return error_response(&not_ready());
    }
    let req = match parse_body(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };

    let cipher = state.cipher.clone();
    let DecryptRequest { payload, strict } = req;
    let result = tokio::task::spawn_blocking(move || {
        let codec = RecordCodec::new(&cipher);
        if strict {
            codec.decrypt_record_strict(&payload)
        } else {
            Ok(codec.decrypt_record(&payload))
        }
    })
    .await;

    match result {
        Ok(Ok(payload)) => (StatusCode::OK, Json(RecordResponse { payload })).into_response(),
        Ok(Err(e)) => {
            warn!(error = %e, "strict record decryption failed");
            error_response(&ServiceError::DecryptionFailure(
                "record cannot be decrypted".into(),
            ))
        }
        Err(e) => {
            error!(error = %e, "decryption task failed");
            error_response(&ServiceError::Internal("decryption task failed".into()))
        }
    }
}

/// `POST /hash`: one-way index digest of a single value.
///
/// Independent of the master key, so served even when not ready.
pub async fn hash(body: Result<Json<HashRequest>, JsonRejection>) -> Response {
    let req = match parse_body(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let digest = index_hash(&req.value);
    (StatusCode::OK, Json(HashResponse { digest })).into_response()
}

/// `GET /health`: encryption status report.
///
/// Returns `200 OK` when the key is usable and the self-test passed, `503`
/// otherwise. The body is the status report in both cases.
pub async fn health(State(state): State<AppState>) -> Response {
    let status_code = if state.ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(state.status.as_ref().clone())).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn not_ready() -> ServiceError {
    ServiceError::Unavailable("encryption self-test has not passed".into())
}

/// Unwrap a JSON body or turn the rejection into a `400` error body.
///
/// The rejection text can quote the payload, so only its status is logged.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match body {
        Ok(Json(req)) => Ok(req),
        Err(rejection) => {
            warn!(status = %rejection.status(), "request body rejected");
            Err(error_response(&ServiceError::BadRequest(
                "request body is not valid JSON for this endpoint".into(),
            )))
        }
    }
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}
