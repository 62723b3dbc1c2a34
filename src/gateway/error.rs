use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::classifier::ClassifierError;
use crate::constants::RELATE_STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Classification(#[from] ClassifierError),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Classification(ClassifierError::UnknownStage { .. }) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Classification(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Value of the status header for this error.
    pub fn status_tag(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::Classification(ClassifierError::UnknownStage { .. }) => "unknown_stage",
            GatewayError::Classification(ClassifierError::Retrieval { .. }) => {
                "classification_error"
            }
            GatewayError::Classification(ClassifierError::DuplicateStage { .. })
            | GatewayError::InternalError(_) => "internal_error",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            RELATE_STATUS_HEADER,
            HeaderValue::from_static(self.status_tag()),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
