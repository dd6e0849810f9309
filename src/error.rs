use axum::{
	extract::rejection::{FormRejection, JsonRejection, PathRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::{error, warn};

use crate::types::Rid;

#[derive(Error, Debug)]
pub enum AppError {
	#[error("Malformed payload: {0}")]
	MalformedPayload(String),

	#[error("Invalid restaurant id: {0}")]
	InvalidId(String),

	#[error("Rejected by storage: {0}")]
	Rejected(String),

	#[error("Restaurant {0} not found")]
	NotFound(Rid),

	#[error("No route for {0}")]
	UnknownRoute(String),

	#[error("Database error: {0}")]
	Database(sqlx::Error),
}

#[derive(Serialize)]
struct ErrorEnvelope {
	status: &'static str,
	message: String,
}

impl AppError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
			AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
			AppError::Rejected(_) => StatusCode::BAD_REQUEST,
			AppError::NotFound(_) => StatusCode::NOT_FOUND,
			AppError::UnknownRoute(_) => StatusCode::NOT_FOUND,
			AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

// constraint violations are the client's fault, everything else is ours
impl From<sqlx::Error> for AppError {
	fn from(err: sqlx::Error) -> Self {
		if let sqlx::Error::Database(db_err) = &err {
			match db_err.kind() {
				ErrorKind::NotNullViolation
				| ErrorKind::CheckViolation
				| ErrorKind::UniqueViolation
				| ErrorKind::ForeignKeyViolation => {
					return AppError::Rejected(db_err.message().to_string());
				},
				_ => {},
			}
		}
		AppError::Database(err)
	}
}

impl From<JsonRejection> for AppError {
	fn from(rejection: JsonRejection) -> Self {
		AppError::MalformedPayload(rejection.body_text())
	}
}

impl From<FormRejection> for AppError {
	fn from(rejection: FormRejection) -> Self {
		AppError::MalformedPayload(rejection.body_text())
	}
}

impl From<PathRejection> for AppError {
	fn from(rejection: PathRejection) -> Self {
		AppError::InvalidId(rejection.body_text())
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let message = match &self {
			AppError::Database(err) => {
				error!("{err}");
				"Internal error".to_string()
			},
			other => {
				warn!("{other}");
				other.to_string()
			},
		};

		(status, Json(ErrorEnvelope { status: "error", message })).into_response()
	}
}
