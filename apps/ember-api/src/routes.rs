use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use ember_chat::{ChatRequest, ChatResponse, Error as ChatError, IngestReport};
use ember_storage::models::DocumentRecord;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/chat", post(chat))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/admin/bootstrap", post(bootstrap)).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let response = state.service.chat(payload).await?;
	Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct BootstrapRequest {
	documents: Vec<DocumentRecord>,
}

async fn bootstrap(
	State(state): State<AppState>,
	Json(payload): Json<BootstrapRequest>,
) -> Result<Json<IngestReport>, ApiError> {
	let report = state.service.bootstrap(&payload.documents).await?;
	Ok(Json(report))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ChatError> for ApiError {
	fn from(err: ChatError) -> Self {
		// Recoverable failures never reach this layer; what does is either a
		// bad request or a pipeline error whose detail belongs in the logs,
		// not in the response body.
		match err {
			ChatError::InvalidRequest { message } =>
				ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "invalid_request", message),
			ChatError::Classifier { message } => {
				tracing::error!(detail = %message, "Query classification failed.");

				ApiError::new(
					StatusCode::INTERNAL_SERVER_ERROR,
					"classification_failed",
					"The message could not be processed.",
				)
			},
			ChatError::Provider { message } => {
				tracing::error!(detail = %message, "Upstream provider call failed.");

				ApiError::new(
					StatusCode::BAD_GATEWAY,
					"provider_unavailable",
					"An upstream service is unavailable.",
				)
			},
			ChatError::Qdrant { message } => {
				tracing::error!(detail = %message, "Vector store call failed.");

				ApiError::new(
					StatusCode::BAD_GATEWAY,
					"vector_store_unavailable",
					"The document index is unavailable.",
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
