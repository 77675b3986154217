use crate::domain::RelayError;
use crate::interface_adapters::protocol::ErrorResponse;
use crate::interface_adapters::state::AppState;
use crate::use_cases::DispatchTaskUseCase;
use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

// Single entry point: preflight short-circuits, everything else is dispatched as a task.
#[tracing::instrument(
    name = "relay",
    skip_all,
    fields(method = %method, task = tracing::field::Empty)
)]
pub async fn relay(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::OK, "ok").into_response();
    }

    // Body read failures (oversize, aborted upload) take the same 500 path as parse failures.
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::error!(error = %rejection, "failed to read request body.");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &rejection.body_text());
        }
    };

    let use_case = DispatchTaskUseCase {
        provider: state.provider.clone(),
    };

    match use_case.execute(&body).await {
        Ok(result) => {
            tracing::info!("task dispatched successfully.");
            (StatusCode::OK, Json(result.body)).into_response()
        }
        Err(failure) => map_relay_error(failure.error),
    }
}

// Unknown tasks are the only client error; every other failure funnels into a 500.
fn map_relay_error(err: RelayError) -> Response {
    match err {
        RelayError::UnknownTask => {
            tracing::warn!("unknown task requested.");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
        RelayError::MalformedBody(_) | RelayError::InvalidPayload(_) | RelayError::Provider(_) => {
            tracing::error!(error = ?err, "task dispatch failed.");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> Response {
    let message = if message.is_empty() {
        INTERNAL_ERROR_MESSAGE
    } else {
        message
    };
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
